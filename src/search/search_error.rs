use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum SearchError {
    Network(String),
    Timeout(String),
    Blocked(String),
    HtmlParse(String),
}

impl fmt::Display for SearchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchError::Network(msg) => write!(f, "Network error: {msg}"),
            SearchError::Timeout(msg) => write!(f, "Timed out: {msg}"),
            SearchError::Blocked(msg) => write!(f, "Blocked by site: {msg}"),
            SearchError::HtmlParse(msg) => write!(f, "HTML parse error: {msg}"),
        }
    }
}

impl Error for SearchError {}

impl From<reqwest::Error> for SearchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            SearchError::Timeout(e.to_string())
        } else {
            SearchError::Network(e.to_string())
        }
    }
}
