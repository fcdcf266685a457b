use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Genres offered on the form, in display order
pub const GENRES: [&str; 12] = [
    "Aksiyon",
    "Komedi",
    "Drama",
    "Bilim Kurgu",
    "Korku",
    "Romantik",
    "Western",
    "Animasyon",
    "Belgesel",
    "Suç Filmi",
    "Tarih",
    "Anime",
];

/// Preferred languages offered on the form, in display order
pub const LANGUAGES: [&str; 9] = [
    "English",
    "Türkçe",
    "Français",
    "Deutsch",
    "Español",
    "Italiano",
    "日本語",
    "한국어",
    "中文",
];

/// Number of favorite movies a user must name
pub const FAVORITE_COUNT: usize = 3;

/// What a user picked on the form
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserSelection {
    pub genres: Vec<String>,
    pub languages: Vec<String>,
    pub favorite_movies: [String; FAVORITE_COUNT],
}

impl UserSelection {
    pub fn new(
        genres: Vec<String>,
        languages: Vec<String>,
        favorite_movies: [String; FAVORITE_COUNT],
    ) -> Self {
        Self {
            genres,
            languages,
            favorite_movies,
        }
    }

    /// Checks the selection and returns it in canonical form.
    ///
    /// Genres and languages behave as sets: unknown values are rejected,
    /// duplicates collapse, and the result follows catalog order. Favorites
    /// are trimmed and must not be blank.
    pub fn validated(self) -> AppResult<Self> {
        let genres = canonical_subset(&self.genres, &GENRES, "genre")?;
        let languages = canonical_subset(&self.languages, &LANGUAGES, "language")?;

        if genres.is_empty() {
            return Err(AppError::Validation(
                "Select at least one genre".to_string(),
            ));
        }
        if languages.is_empty() {
            return Err(AppError::Validation(
                "Select at least one language".to_string(),
            ));
        }

        let favorite_movies = self.favorite_movies.map(|movie| movie.trim().to_string());
        if favorite_movies.iter().any(|movie| movie.is_empty()) {
            return Err(AppError::Validation(format!(
                "Enter all {} favorite movies",
                FAVORITE_COUNT
            )));
        }

        Ok(Self {
            genres,
            languages,
            favorite_movies,
        })
    }
}

fn canonical_subset(values: &[String], catalog: &[&str], kind: &str) -> AppResult<Vec<String>> {
    if let Some(unknown) = values.iter().find(|v| !catalog.contains(&v.as_str())) {
        return Err(AppError::Validation(format!("Unknown {}: {}", kind, unknown)));
    }

    Ok(catalog
        .iter()
        .filter(|entry| values.iter().any(|v| v.as_str() == **entry))
        .map(|entry| entry.to_string())
        .collect())
}
