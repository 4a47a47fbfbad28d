// errors.rs
use crate::search::SearchError;
use crate::store::ConfigError;
use std::fmt;

/// Errors that end a run. Search and notification failures never get here;
/// they are handled per entry and per message.
#[derive(Debug)]
pub enum AppError {
    /// The config file could not be read, parsed or validated.
    Config(ConfigError),
    /// The search client could not be built.
    Search(SearchError),
    Logging(String),
    /// Updated thresholds could not be written back. The next run would
    /// compare against stale prices and re-notify, so this is reported apart.
    Persistence(ConfigError),
}

impl AppError {
    pub fn exit_code(&self) -> u8 {
        match self {
            AppError::Persistence(_) => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Could not load config: {e}"),
            AppError::Search(e) => write!(f, "Could not start fare search: {e}"),
            AppError::Logging(msg) => write!(f, "Could not set up logging: {msg}"),
            AppError::Persistence(e) => write!(f, "Could not save updated prices: {e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}
