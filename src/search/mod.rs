mod models;
mod search_error;
pub(crate) mod southwest;

pub use models::{SearchQuery, SearchResults};
pub use search_error::SearchError;
pub use southwest::SouthwestProvider;

/// Anything that can run a fare search and hand back raw result rows.
///
/// Implementations do their own network I/O; callers treat any error as
/// "no fares this run" for the entry in question.
pub trait SearchProvider {
    fn search(&self, query: &SearchQuery) -> Result<SearchResults, SearchError>;
}
