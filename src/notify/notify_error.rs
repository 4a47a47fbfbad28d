// src/notify/notify_error.rs
use std::fmt;

/// Why a text message didn't go out.
#[derive(Debug)]
pub enum NotifyError {
    /// The HTTP request never got a response.
    RequestFailed(String),
    /// Twilio answered, but refused the message.
    ApiError(String),
}

impl fmt::Display for NotifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NotifyError::RequestFailed(msg) => write!(f, "SMS request failed: {msg}"),
            NotifyError::ApiError(msg) => write!(f, "Twilio rejected the SMS: {msg}"),
        }
    }
}

impl std::error::Error for NotifyError {}
