use std::sync::Arc;

use crate::config::Config;
use crate::db::HistoryLog;
use crate::error::AppResult;
use crate::services::{CompletionProvider, OpenAiProvider};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn CompletionProvider>,
    pub history: Arc<HistoryLog>,
}

impl AppState {
    /// Creates state from an explicit provider and history log
    pub fn new(provider: Arc<dyn CompletionProvider>, history: HistoryLog) -> Self {
        Self {
            provider,
            history: Arc::new(history),
        }
    }

    /// Wires the OpenAI provider and the configured history file
    pub fn from_config(config: &Config) -> AppResult<Self> {
        let provider = OpenAiProvider::from_config(config)?;
        Ok(Self::new(
            Arc::new(provider),
            HistoryLog::new(config.history_path.clone()),
        ))
    }
}
