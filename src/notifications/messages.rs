// src/notifications/messages.rs

use anyhow::{Context, Result};
use futures::future::try_join_all;
use log::{error, info, warn};
use std::sync::Arc;

use super::{deliver_and_prune, PushNotification, PushSender};
use crate::models::{ChatMessage, MessageRef};
use crate::profiles::{notification_amount, ProfileStore};

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MessageNotifyStats {
    pub recipients: usize,
    pub missing_recipients: usize,
    pub delivered: usize,
    /// Recipients whose delivery failed; the others are still notified.
    pub failed: usize,
}

/// Notifies the recipients of a new chat message.
pub struct MessageNotifier {
    profiles: Arc<dyn ProfileStore>,
    sender: Arc<dyn PushSender>,
}

impl MessageNotifier {
    pub fn new(profiles: Arc<dyn ProfileStore>, sender: Arc<dyn PushSender>) -> Self {
        Self { profiles, sender }
    }

    pub fn build_notification(
        message_ref: &MessageRef,
        message: &ChatMessage,
        badge: usize,
    ) -> PushNotification {
        PushNotification::new(
            format!("{} sent you a message.", message.sender_name),
            message.content.clone(),
        )
        .with_badge(badge)
        .with_data("conversationID", message_ref.conversation_id.clone())
        .with_data("messageID", message_ref.message_id.clone())
    }

    pub async fn notify(
        &self,
        message_ref: &MessageRef,
        message: &ChatMessage,
    ) -> Result<MessageNotifyStats> {
        // Recipient lookups run together; any failed lookup aborts the fan-out.
        let lookups = message
            .recipient_ids
            .iter()
            .map(|id| self.profiles.get_profile(id));
        let recipients = try_join_all(lookups)
            .await
            .context("Failed to load message recipients")?;

        let mut stats = MessageNotifyStats {
            recipients: message.recipient_ids.len(),
            ..Default::default()
        };
        for (id, recipient) in message.recipient_ids.iter().zip(recipients) {
            let Some(recipient) = recipient else {
                warn!("Message recipient {} does not exist", id);
                stats.missing_recipients += 1;
                continue;
            };
            let notification =
                Self::build_notification(message_ref, message, notification_amount(&recipient.data));
            match deliver_and_prune(
                self.sender.as_ref(),
                self.profiles.as_ref(),
                &recipient.id,
                &recipient.fcm_tokens,
                &notification,
            )
            .await
            {
                Ok(delivered) => stats.delivered += delivered,
                Err(e) => {
                    error!("Message notification to {} failed: {:?}", recipient.id, e);
                    stats.failed += 1;
                }
            }
        }

        info!(
            "Message {}/{}: delivered {} notifications to {} recipients ({} failed)",
            message_ref.conversation_id,
            message_ref.message_id,
            stats.delivered,
            stats.recipients,
            stats.failed
        );
        Ok(stats)
    }
}
