use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::Html,
    Extension, Form, Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::db::AppendOutcome;
use crate::error::{AppError, AppResult};
use crate::middleware::request_id::RequestId;
use crate::models::{
    History, HistoryEntry, RecommendationRow, UserSelection, FAVORITE_COUNT, GENRES, LANGUAGES,
};
use crate::services::recommendations;

use super::views::{render_page, PageView};
use super::AppState;

// Request/Response types

/// Whether the history section is visible on the page
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HistoryToggle {
    Show,
    #[default]
    Hide,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub history: HistoryToggle,
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub genres: Vec<&'static str>,
    pub languages: Vec<&'static str>,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub recommendations: Vec<RecommendationRow>,
    #[serde(flatten)]
    pub log: AppendOutcome,
}

#[derive(Debug, Serialize)]
pub struct HistoryResponse {
    /// Most recent submission first
    pub entries: Vec<HistoryEntry>,
    pub corrupt: bool,
}

/// Maps submitted form fields onto a selection.
///
/// Checkbox groups arrive as repeated `genres` / `languages` keys and the three
/// text inputs as repeated `favorite_movies` keys, in page order. Missing
/// favorites become empty strings so validation can report them.
pub fn selection_from_form(fields: Vec<(String, String)>) -> UserSelection {
    let mut genres = Vec::new();
    let mut languages = Vec::new();
    let mut favorites = Vec::new();

    for (key, value) in fields {
        match key.as_str() {
            "genres" => genres.push(value),
            "languages" => languages.push(value),
            "favorite_movies" => favorites.push(value),
            _ => {}
        }
    }

    let mut favorites = favorites.into_iter();
    let favorite_movies: [String; FAVORITE_COUNT] =
        std::array::from_fn(|_| favorites.next().unwrap_or_default());

    UserSelection::new(genres, languages, favorite_movies)
}

async fn history_for(state: &AppState, toggle: HistoryToggle) -> AppResult<Option<History>> {
    match toggle {
        HistoryToggle::Show => Ok(Some(state.history.load_all().await?)),
        HistoryToggle::Hide => Ok(None),
    }
}

// Handlers

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// Renders the empty form, with history if toggled on
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Html<String>> {
    let view = PageView {
        history: history_for(&state, query.history).await?,
        ..PageView::default()
    };
    Ok(Html(render_page(&view)))
}

/// Handles a form submission from the page
pub async fn submit_form(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Query(query): Query<PageQuery>,
    Form(fields): Form<Vec<(String, String)>>,
) -> AppResult<(StatusCode, Html<String>)> {
    let selection = selection_from_form(fields);

    tracing::info!(
        request_id = %request_id,
        genres = selection.genres.len(),
        languages = selection.languages.len(),
        "Processing form submission"
    );

    let (status, view) =
        match recommendations::submit(state.provider.as_ref(), &state.history, selection.clone())
            .await
        {
            Ok(submission) => (
                StatusCode::OK,
                PageView {
                    selection: Some(submission.selection),
                    recommendations: Some(submission.recommendations),
                    log: Some(submission.log),
                    ..PageView::default()
                },
            ),
            Err(AppError::Validation(reason)) => {
                tracing::info!(request_id = %request_id, reason = %reason, "Form rejected");
                (
                    StatusCode::BAD_REQUEST,
                    PageView {
                        selection: Some(selection),
                        warning: Some(
                            "Lütfen en az bir tür seçin, en az bir dil seçin ve üç favori film girin."
                                .to_string(),
                        ),
                        ..PageView::default()
                    },
                )
            }
            Err(e) => return Err(e),
        };

    // Loaded after the append so a just-submitted entry shows up as Öneri 1
    let view = PageView {
        history: history_for(&state, query.history).await?,
        ..view
    };

    Ok((status, Html(render_page(&view))))
}

/// Lists the genres and languages a selection may use
pub async fn get_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        genres: GENRES.to_vec(),
        languages: LANGUAGES.to_vec(),
    })
}

/// Requests recommendations for a JSON selection and records them
pub async fn create_recommendations(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    Json(selection): Json<UserSelection>,
) -> AppResult<(StatusCode, Json<RecommendationResponse>)> {
    tracing::info!(
        request_id = %request_id,
        genres = selection.genres.len(),
        languages = selection.languages.len(),
        "Processing recommendation request"
    );

    let submission =
        recommendations::submit(state.provider.as_ref(), &state.history, selection).await?;

    tracing::info!(
        request_id = %request_id,
        rows = submission.recommendations.len(),
        "Recommendation request completed"
    );

    Ok((
        StatusCode::CREATED,
        Json(RecommendationResponse {
            recommendations: submission.recommendations,
            log: submission.log,
        }),
    ))
}

/// Returns the stored history, most recent first
pub async fn get_history(State(state): State<AppState>) -> AppResult<Json<HistoryResponse>> {
    let history = state.history.load_all().await?;
    let corrupt = history.is_corrupt();

    Ok(Json(HistoryResponse {
        entries: history.entries.into_iter().rev().collect(),
        corrupt,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field(key: &str, value: &str) -> (String, String) {
        (key.to_string(), value.to_string())
    }

    #[test]
    fn test_selection_from_form() {
        let selection = selection_from_form(vec![
            field("genres", "Komedi"),
            field("genres", "Drama"),
            field("languages", "English"),
            field("favorite_movies", "A"),
            field("favorite_movies", "B"),
            field("favorite_movies", "C"),
            field("unrelated", "x"),
        ]);

        assert_eq!(selection.genres, vec!["Komedi", "Drama"]);
        assert_eq!(selection.languages, vec!["English"]);
        assert_eq!(selection.favorite_movies, ["A", "B", "C"]);
    }

    #[test]
    fn test_selection_from_form_pads_missing_favorites() {
        let selection = selection_from_form(vec![field("favorite_movies", "A")]);
        assert_eq!(selection.favorite_movies, ["A", "", ""]);
    }

    #[test]
    fn test_history_toggle_defaults_to_hidden() {
        assert_eq!(PageQuery::default().history, HistoryToggle::Hide);
    }
}
