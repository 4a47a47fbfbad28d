use serde::Deserialize;

/// `twilio:` section. Without it, drops are only logged.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TwilioSettings {
    pub account_sid: String,
    pub auth_token: String,
    pub from: String,
    pub to: String,
}

/// Optional `search:` section tuning the fare search client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchSettings {
    pub base_url: String,
    /// Used when the landing page has no booking form to read an action from.
    pub search_path: String,
    pub user_agent: String,
    pub timeout_secs: u64,
    pub pause_secs: u64,
    pub jitter_secs: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://www.southwest.com/".to_string(),
            search_path: "/flight/search-flight.html".to_string(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36".to_string(),
            timeout_secs: 60,
            pause_secs: 5,
            jitter_secs: 3,
        }
    }
}
