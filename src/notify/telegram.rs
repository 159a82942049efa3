//! Telegram delivery for terminal notifications

use crate::config::NotifierSettings;
use crate::notify::{Notification, Notifier};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

const API_BASE: &str = "https://api.telegram.org";

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Sends notifications through the Telegram bot API
pub struct TelegramNotifier {
    client: Client,
    settings: NotifierSettings,
}

impl TelegramNotifier {
    /// Create a notifier for the configured bot and chat
    pub fn new(settings: NotifierSettings) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self { client, settings }
    }

    fn send_message_url(&self) -> String {
        format!("{API_BASE}/bot{}/sendMessage", self.settings.token)
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn send(&self, notification: &Notification) {
        let mut form = vec![
            ("chat_id", self.settings.chat_id.clone()),
            ("text", notification.text.clone()),
            ("parse_mode", "HTML".to_string()),
        ];
        if let Some(thread_id) = &self.settings.thread_id {
            form.push(("message_thread_id", thread_id.clone()));
        }

        // Delivery faults are logged and swallowed: the notification is
        // advisory and the run's outcome is already decided.
        match self.client.post(self.send_message_url()).form(&form).send().await {
            Ok(response) if response.status().is_success() => {
                debug!("notification delivered");
            }
            Ok(response) => {
                warn!("telegram answered HTTP {}", response.status());
            }
            Err(e) => {
                warn!("telegram delivery failed: {e}");
            }
        }
    }
}
