use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One recommended movie as parsed from the provider reply
///
/// Persisted as a three element array `[title, genre, summary]`. Older logs
/// may hold rows split on every delimiter, so reading accepts any length:
/// fields past the third are rejoined into the summary and missing ones are
/// left empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecommendationRow {
    pub title: String,
    pub genre: String,
    pub summary: String,
}

impl RecommendationRow {
    pub fn new(
        title: impl Into<String>,
        genre: impl Into<String>,
        summary: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            genre: genre.into(),
            summary: summary.into(),
        }
    }

    pub fn fields(&self) -> [&str; 3] {
        [&self.title, &self.genre, &self.summary]
    }
}

impl Serialize for RecommendationRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RecommendationRow {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let fields = Vec::<String>::deserialize(deserializer)?;
        let mut fields = fields.into_iter();
        let title = fields.next().unwrap_or_default();
        let genre = fields.next().unwrap_or_default();
        let summary = fields.collect::<Vec<_>>().join("|");
        Ok(Self {
            title,
            genre,
            summary,
        })
    }
}
