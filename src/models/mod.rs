mod history;
mod recommendation;
mod selection;

pub use history::{History, HistoryEntry, HistoryStatus};
pub use recommendation::RecommendationRow;
pub use selection::{UserSelection, FAVORITE_COUNT, GENRES, LANGUAGES};
