pub mod history_log;

pub use history_log::AppendOutcome;
pub use history_log::HistoryLog;
