use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tokio::sync::Mutex;

use crate::error::AppResult;
use crate::models::{History, HistoryEntry};

/// Result of appending an entry to the history log
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "log", rename_all = "snake_case")]
pub enum AppendOutcome {
    /// The entry was added after the existing history
    Appended,
    /// The previous file could not be parsed; it was moved aside and a new log
    /// holding only this entry was written
    RecoveredFromCorrupt { quarantined_to: PathBuf },
}

/// What was found on disk before parsing
enum LogContents {
    Entries(Vec<HistoryEntry>),
    Corrupt(serde_json::Error),
}

/// Append-only recommendation history stored as one JSON array on disk
///
/// The whole file is read on every load and rewritten on every append.
/// Appends within this process are serialized; other processes writing the
/// same file are not coordinated.
pub struct HistoryLog {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads every entry in chronological order.
    ///
    /// A missing or empty file is an empty history. A file that does not parse
    /// is reported as corrupt with no entries.
    pub async fn load_all(&self) -> AppResult<History> {
        match self.read_contents().await? {
            LogContents::Entries(entries) => Ok(History {
                entries,
                ..History::empty()
            }),
            LogContents::Corrupt(e) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %e,
                    "History log is not valid JSON"
                );
                Ok(History::corrupt())
            }
        }
    }

    /// Appends one entry and rewrites the log.
    pub async fn append(&self, entry: HistoryEntry) -> AppResult<AppendOutcome> {
        let _guard = self.write_lock.lock().await;

        let (mut entries, outcome) = match self.read_contents().await? {
            LogContents::Entries(entries) => (entries, AppendOutcome::Appended),
            LogContents::Corrupt(e) => {
                let quarantined_to = self.quarantine().await?;
                tracing::warn!(
                    path = %self.path.display(),
                    quarantined_to = %quarantined_to.display(),
                    error = %e,
                    "History log was corrupt, starting a new one"
                );
                (Vec::new(), AppendOutcome::RecoveredFromCorrupt { quarantined_to })
            }
        };

        entries.push(entry);
        self.write_entries(&entries).await?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "History entry appended"
        );

        Ok(outcome)
    }

    async fn read_contents(&self) -> AppResult<LogContents> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(LogContents::Entries(Vec::new())),
            Err(e) => return Err(e.into()),
        };

        if content.iter().all(u8::is_ascii_whitespace) {
            return Ok(LogContents::Entries(Vec::new()));
        }

        // Invalid UTF-8 surfaces here as a parse error, same as malformed JSON
        Ok(match serde_json::from_slice::<Vec<HistoryEntry>>(&content) {
            Ok(entries) => LogContents::Entries(entries),
            Err(e) => LogContents::Corrupt(e),
        })
    }

    async fn quarantine(&self) -> AppResult<PathBuf> {
        let stamp = Utc::now().format("%Y%m%dT%H%M%S%.3fZ");
        let target = sibling_path(&self.path, &format!("corrupt-{}", stamp));
        tokio::fs::rename(&self.path, &target).await?;
        Ok(target)
    }

    async fn write_entries(&self, entries: &[HistoryEntry]) -> AppResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_vec(entries)?;
        let tmp = sibling_path(&self.path, "tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

/// `<path>.<suffix>` next to the log file
fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".");
    name.push(suffix);
    PathBuf::from(name)
}
