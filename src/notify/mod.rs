//! Terminal run notifications
//!
//! One notification per run, success or failure, delivered to an
//! operational channel. Delivery is fire-and-forget: a notification that
//! cannot be sent is logged and dropped, never retried or escalated.

mod telegram;

pub use telegram::TelegramNotifier;

use async_trait::async_trait;

/// A short status message marking the end of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Whether the run reached a successful terminal state
    pub success: bool,
    /// HTML-formatted message body
    pub text: String,
}

impl Notification {
    /// Success message naming the submitted artifact (file name only,
    /// never the full path)
    pub fn success(file_label: &str) -> Self {
        Self {
            success: true,
            text: format!(
                "\u{2705} Order confirmation <b>{}</b> accepted by the portal.",
                escape_html(file_label)
            ),
        }
    }

    /// Failure message carrying the stage error or portal rejection
    pub fn failure(message: &str) -> Self {
        Self {
            success: false,
            text: format!(
                "\u{274c} Order confirmation submission failed:\n<code>{}</code>",
                escape_html(message)
            ),
        }
    }
}

// Telegram parses the message as HTML, so dynamic parts must not carry
// markup characters through.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// One-way sink for the terminal notification
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the notification; implementations log faults internally
    async fn send(&self, notification: &Notification);
}
