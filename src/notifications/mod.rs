// src/notifications/mod.rs
//
// Push notifications: payloads, the delivery seam, device-token hygiene and
// the two notification flows (chat messages, incomplete-profile reminders).

mod messages;
mod reminders;
mod tokens;

use async_trait::async_trait;
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;

pub use messages::{MessageNotifier, MessageNotifyStats};
pub use reminders::{ProfileReminder, ReminderStats};
pub use tokens::{deliver_and_prune, prune_failed_tokens, UNREGISTERED_TOKEN_CODES};

/// A notification sent to every device of one profile.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushNotification {
    pub title: String,
    pub body: String,
    pub sound: String,
    pub badge: Option<usize>,
    pub data: BTreeMap<String, String>,
}

impl PushNotification {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            sound: "default".to_string(),
            badge: None,
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: &str, value: impl Into<String>) -> Self {
        self.data.insert(key.to_string(), value.into());
        self
    }

    pub fn with_badge(mut self, badge: usize) -> Self {
        self.badge = Some(badge);
        self
    }
}

/// Outcome for one device token, in the order the tokens were sent.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryResult {
    pub token: String,
    /// Provider error code such as `messaging/registration-token-not-registered`.
    pub error_code: Option<String>,
}

impl DeliveryResult {
    pub fn delivered(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            error_code: None,
        }
    }

    pub fn failed(token: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            error_code: Some(code.into()),
        }
    }
}

/// Delivery to a push provider.
#[async_trait]
pub trait PushSender: Send + Sync {
    async fn send_to_devices(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> anyhow::Result<Vec<DeliveryResult>>;
}

/// Sender that only logs. Used when no push provider is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogPushSender;

#[async_trait]
impl PushSender for LogPushSender {
    async fn send_to_devices(
        &self,
        tokens: &[String],
        notification: &PushNotification,
    ) -> anyhow::Result<Vec<DeliveryResult>> {
        info!(
            "[dry-run] push '{}' to {} device(s): {}",
            notification.title,
            tokens.len(),
            notification.body
        );
        Ok(tokens.iter().map(DeliveryResult::delivered).collect())
    }
}
