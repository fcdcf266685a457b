//! Completion provider abstraction
//!
//! The recommendation flow only needs "send a system and a user message, get
//! text back". Providers hide the wire format of a particular API.
use crate::error::AppResult;

pub mod openai;

pub use openai::OpenAiProvider;

/// Trait for text completion providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Sends one chat turn and returns the text of the first choice.
    ///
    /// Transport failures and non-success responses are returned as errors;
    /// no retry is attempted.
    async fn complete(&self, system: &str, prompt: &str) -> AppResult<String>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
