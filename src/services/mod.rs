pub mod prompt;
pub mod providers;
pub mod recommendations;

pub use providers::{CompletionProvider, OpenAiProvider};
pub use recommendations::{parse_recommendations, request_recommendations, submit, Submission};
