use crate::models::UserSelection;

/// System message sent with every recommendation request
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that recommends movies.";

/// Number of movies asked for in the prompt
pub const RECOMMENDATION_COUNT: usize = 5;

/// Separator the reply is asked to use between fields
pub const FIELD_DELIMITER: char = '|';

/// Builds the user message for a validated selection
pub fn build_prompt(selection: &UserSelection) -> String {
    format!(
        "Suggest {} movies based on the following genres: {}. \
         The user's favorite movies are: {}. \
         The user's preferred languages are: {}. \
         Provide the results in the following format: Movie Name {d} Genre {d} Short Summary",
        RECOMMENDATION_COUNT,
        selection.genres.join(", "),
        selection.favorite_movies.join(", "),
        selection.languages.join(", "),
        d = FIELD_DELIMITER,
    )
}
