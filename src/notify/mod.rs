mod notify_error;
mod twilio;

pub use notify_error::NotifyError;
pub use twilio::TwilioNotifier;

use tracing::{error, info};

/// A channel that can deliver a plain-text message to the owner.
pub trait Notifier {
    fn send(&self, body: &str) -> Result<(), NotifyError>;
}

/// Used when no SMS channel is configured; drops only show up in the log.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn send(&self, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    pub sent: usize,
    pub failed: usize,
}

/// Log and send each message once. A failed send is logged and counted;
/// it never stops the remaining messages.
pub fn deliver(notifier: &dyn Notifier, messages: &[String]) -> DeliveryReport {
    let mut report = DeliveryReport::default();

    for message in messages {
        info!("{message}");
        match notifier.send(message) {
            Ok(()) => report.sent += 1,
            Err(e) => {
                report.failed += 1;
                error!("❌ Notification failed: {e}");
            }
        }
    }

    report
}
