use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::json;
use tempfile::TempDir;

use movie_recs_api::api::{create_router, AppState};
use movie_recs_api::db::HistoryLog;
use movie_recs_api::error::{AppError, AppResult};
use movie_recs_api::services::CompletionProvider;

const REPLY: &str = "Movie1 | Comedy | Funny\nnotes: ignore this\nMovie2 | Comedy | Also funny";

/// Provider that answers every prompt with a fixed reply, or fails
struct StubProvider {
    reply: Option<&'static str>,
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl CompletionProvider for StubProvider {
    async fn complete(&self, _system: &str, _prompt: &str) -> AppResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.reply
            .map(str::to_string)
            .ok_or_else(|| AppError::ExternalApi("API returned status 401".to_string()))
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

struct TestApp {
    server: TestServer,
    provider: Arc<StubProvider>,
    dir: TempDir,
}

impl TestApp {
    fn history_path(&self) -> std::path::PathBuf {
        self.dir.path().join("recommendations.json")
    }
}

fn create_test_app(reply: Option<&'static str>) -> TestApp {
    let dir = TempDir::new().unwrap();
    let provider = Arc::new(StubProvider {
        reply,
        calls: AtomicUsize::new(0),
    });
    let state = AppState::new(
        provider.clone(),
        HistoryLog::new(dir.path().join("recommendations.json")),
    );
    let server = TestServer::new(create_router(state)).unwrap();

    TestApp {
        server,
        provider,
        dir,
    }
}

fn valid_selection() -> serde_json::Value {
    json!({
        "genres": ["Komedi"],
        "languages": ["English"],
        "favorite_movies": ["A", "B", "C"]
    })
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app(Some(REPLY));
    let response = app.server.get("/health").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = create_test_app(Some(REPLY));
    let response = app.server.get("/health").await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_catalog() {
    let app = create_test_app(Some(REPLY));
    let response = app.server.get("/api/v1/catalog").await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["genres"].as_array().unwrap().len(), 12);
    assert_eq!(body["languages"].as_array().unwrap().len(), 9);
}

#[tokio::test]
async fn test_create_recommendations() {
    let app = create_test_app(Some(REPLY));

    let response = app
        .server
        .post("/api/v1/recommendations")
        .json(&valid_selection())
        .await;

    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(
        body["recommendations"],
        json!([["Movie1", " Comedy", " Funny"], ["Movie2", " Comedy", " Also funny"]])
    );
    assert_eq!(body["log"], "appended");
}

#[tokio::test]
async fn test_invalid_selection_is_rejected_without_provider_call() {
    let app = create_test_app(Some(REPLY));

    let response = app
        .server
        .post("/api/v1/recommendations")
        .json(&json!({
            "genres": [],
            "languages": ["English"],
            "favorite_movies": ["A", "B", "C"]
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
    assert!(!app.history_path().exists());
}

#[tokio::test]
async fn test_provider_failure_is_bad_gateway() {
    let app = create_test_app(None);

    let response = app
        .server
        .post("/api/v1/recommendations")
        .json(&valid_selection())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let history: serde_json::Value = app.server.get("/api/v1/history").await.json();
    assert!(history["entries"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_history_most_recent_first() {
    let app = create_test_app(Some(REPLY));

    for first in ["First", "Second"] {
        app.server
            .post("/api/v1/recommendations")
            .json(&json!({
                "genres": ["Drama"],
                "languages": ["Türkçe"],
                "favorite_movies": [first, "B", "C"]
            }))
            .await
            .assert_status(StatusCode::CREATED);
    }

    let response = app.server.get("/api/v1/history").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();

    assert_eq!(body["corrupt"], false);
    let entries = body["entries"].as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["user_input"]["favorite_movies"][0], "Second");
    assert_eq!(entries[1]["user_input"]["favorite_movies"][0], "First");
}

#[tokio::test]
async fn test_corrupt_log_is_reported_and_recovered() {
    let app = create_test_app(Some(REPLY));
    std::fs::write(app.history_path(), "[{broken").unwrap();

    let body: serde_json::Value = app.server.get("/api/v1/history").await.json();
    assert_eq!(body["corrupt"], true);

    let response = app
        .server
        .post("/api/v1/recommendations")
        .json(&valid_selection())
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["log"], "recovered_from_corrupt");
    assert!(body["quarantined_to"].as_str().unwrap().contains(".corrupt-"));

    let body: serde_json::Value = app.server.get("/api/v1/history").await.json();
    assert_eq!(body["corrupt"], false);
    assert_eq!(body["entries"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_index_page_renders_form() {
    let app = create_test_app(Some(REPLY));
    let response = app.server.get("/").await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Film Öneri Sistemi"));
    assert!(html.contains("value=\"Bilim Kurgu\""));
    assert!(html.contains("value=\"日本語\""));
    assert!(!html.contains("Önceki Öneriler</h3>"));
}

#[tokio::test]
async fn test_form_submission_renders_table() {
    let app = create_test_app(Some(REPLY));

    let response = app
        .server
        .post("/")
        .form(&[
            ("genres", "Komedi"),
            ("languages", "English"),
            ("favorite_movies", "A"),
            ("favorite_movies", "B"),
            ("favorite_movies", "C"),
        ])
        .await;

    response.assert_status_ok();
    let html = response.text();
    assert!(html.contains("Önerilen Filmler"));
    assert!(html.contains("<td>Movie1</td><td> Comedy</td><td> Funny</td>"));
    assert!(!html.contains("notes: ignore this"));
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_form_submission_missing_favorite_shows_warning() {
    let app = create_test_app(Some(REPLY));

    let response = app
        .server
        .post("/")
        .form(&[
            ("genres", "Komedi"),
            ("languages", "English"),
            ("favorite_movies", "A"),
            ("favorite_movies", ""),
            ("favorite_movies", "C"),
        ])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let html = response.text();
    assert!(html.contains("Lütfen en az bir tür seçin"));
    assert!(html.contains("value=\"Komedi\" checked"));
    assert_eq!(app.provider.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_history_toggle_shows_entries() {
    let app = create_test_app(Some(REPLY));

    let html = app.server.get("/?history=show").await.text();
    assert!(html.contains("Henüz geçmiş öneri bulunmamaktadır."));

    app.server
        .post("/api/v1/recommendations")
        .json(&valid_selection())
        .await
        .assert_status(StatusCode::CREATED);

    let html = app.server.get("/?history=show").await.text();
    assert!(html.contains("Öneri 1"));
    assert!(html.contains("<td>Komedi</td><td>English</td><td>A, B, C</td>"));

    let html = app.server.get("/?history=hide").await.text();
    assert!(!html.contains("Öneri 1"));
}

#[tokio::test]
async fn test_non_utf8_log_is_reported_and_recovered() {
    let app = create_test_app(Some(REPLY));
    std::fs::write(app.history_path(), [0xff, 0xfe, 0x00, b'[']).unwrap();

    let response = app.server.get("/api/v1/history").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["corrupt"], true);

    app.server.get("/?history=show").await.assert_status_ok();

    let response = app
        .server
        .post("/api/v1/recommendations")
        .json(&valid_selection())
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: serde_json::Value = response.json();
    assert_eq!(body["log"], "recovered_from_corrupt");
}
