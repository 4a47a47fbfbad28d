// src/notify/twilio.rs

use crate::notify::{Notifier, NotifyError};
use crate::store::TwilioSettings;
use reqwest::blocking::Client;
use serde::Serialize;
use std::time::Duration;

const TWILIO_API: &str = "https://api.twilio.com/2010-04-01";

pub struct TwilioNotifier {
    settings: TwilioSettings,
    client: Client,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct TwilioMessage<'a> {
    from: &'a str,
    to: &'a str,
    body: &'a str,
}

impl TwilioNotifier {
    pub fn new(settings: TwilioSettings) -> Result<Self, NotifyError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        Ok(Self { settings, client })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/Accounts/{}/Messages.json",
            TWILIO_API, self.settings.account_sid
        )
    }
}

impl Notifier for TwilioNotifier {
    fn send(&self, body: &str) -> Result<(), NotifyError> {
        let payload = TwilioMessage {
            from: &self.settings.from,
            to: &self.settings.to,
            body,
        };

        let resp = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.settings.account_sid, Some(&self.settings.auth_token))
            .form(&payload)
            .send()
            .map_err(|e| NotifyError::RequestFailed(e.to_string()))?;

        let status = resp.status();
        if status.is_success() {
            return Ok(());
        }

        let text = resp.text().unwrap_or_else(|_| "(no body)".to_string());
        Err(NotifyError::ApiError(format!(
            "Twilio {}: {}",
            status,
            api_error_message(&text)
        )))
    }
}

/// Twilio errors come back as `{"code": .., "message": ..}`; fall back to the raw body.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            let message = json.get("message")?.as_str()?.to_string();
            Some(match json.get("code") {
                Some(code) => format!("{message} (code {code})"),
                None => message,
            })
        })
        .unwrap_or_else(|| body.to_string())
}
