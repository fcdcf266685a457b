use serde::{Deserialize, Serialize};

use super::{RecommendationRow, UserSelection};

/// A persisted submission: what the user asked for and what came back
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryEntry {
    pub user_input: UserSelection,
    pub recommendations: Vec<RecommendationRow>,
}

impl HistoryEntry {
    pub fn new(user_input: UserSelection, recommendations: Vec<RecommendationRow>) -> Self {
        Self {
            user_input,
            recommendations,
        }
    }
}

/// Whether the history file could be read as a log
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryStatus {
    Ok,
    Corrupt,
}

/// The full recommendation history in chronological order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History {
    pub entries: Vec<HistoryEntry>,
    pub status: HistoryStatus,
}

impl History {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
            status: HistoryStatus::Ok,
        }
    }

    pub fn corrupt() -> Self {
        Self {
            entries: Vec::new(),
            status: HistoryStatus::Corrupt,
        }
    }

    pub fn is_corrupt(&self) -> bool {
        self.status == HistoryStatus::Corrupt
    }

    /// Entries from the most recent submission back to the first
    pub fn most_recent_first(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().rev()
    }
}
