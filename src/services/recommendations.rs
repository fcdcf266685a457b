use crate::{
    db::{AppendOutcome, HistoryLog},
    error::AppResult,
    models::{HistoryEntry, RecommendationRow, UserSelection},
    services::{
        prompt::{build_prompt, FIELD_DELIMITER, RECOMMENDATION_COUNT, SYSTEM_PROMPT},
        providers::CompletionProvider,
    },
};

/// Outcome of a successful form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub selection: UserSelection,
    pub recommendations: Vec<RecommendationRow>,
    pub log: AppendOutcome,
}

/// Splits a provider reply into rows.
///
/// Only lines containing the delimiter are considered. A line is split into at
/// most three fields, so a stray delimiter stays in the summary; lines that
/// still yield fewer than three fields are dropped. Trailing whitespace is
/// removed from every field. At most five rows are returned.
pub fn parse_recommendations(reply: &str) -> Vec<RecommendationRow> {
    reply
        .trim()
        .lines()
        .filter(|line| line.contains(FIELD_DELIMITER))
        .filter_map(|line| {
            let mut fields = line.splitn(3, FIELD_DELIMITER).map(str::trim_end);
            match (fields.next(), fields.next(), fields.next()) {
                (Some(title), Some(genre), Some(summary)) => {
                    Some(RecommendationRow::new(title, genre, summary))
                }
                _ => None,
            }
        })
        .take(RECOMMENDATION_COUNT)
        .collect()
}

/// Asks the provider for recommendations matching a validated selection
pub async fn request_recommendations(
    provider: &dyn CompletionProvider,
    selection: &UserSelection,
) -> AppResult<Vec<RecommendationRow>> {
    let prompt = build_prompt(selection);
    let reply = provider.complete(SYSTEM_PROMPT, &prompt).await?;
    let rows = parse_recommendations(&reply);

    let line_count = reply.trim().lines().count();
    if rows.len() < line_count {
        tracing::debug!(
            provider = provider.name(),
            kept = rows.len(),
            lines = line_count,
            "Dropped reply lines that were not recommendation rows"
        );
    }

    tracing::info!(
        provider = provider.name(),
        genres = selection.genres.len(),
        languages = selection.languages.len(),
        rows = rows.len(),
        "Recommendations parsed"
    );

    Ok(rows)
}

/// Validates a selection, fetches recommendations and records them
pub async fn submit(
    provider: &dyn CompletionProvider,
    history: &HistoryLog,
    selection: UserSelection,
) -> AppResult<Submission> {
    let selection = selection.validated()?;
    let recommendations = request_recommendations(provider, &selection).await?;

    let log = history
        .append(HistoryEntry::new(selection.clone(), recommendations.clone()))
        .await?;

    Ok(Submission {
        selection,
        recommendations,
        log,
    })
}
