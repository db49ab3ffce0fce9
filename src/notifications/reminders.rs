// src/notifications/reminders.rs

use anyhow::{Context, Result};
use futures::{stream, StreamExt};
use log::{error, info};
use std::sync::Arc;

use super::{deliver_and_prune, PushNotification, PushSender};
use crate::profiles::{percent_complete, Profile, ProfileStore};

const CONCURRENT_REMINDERS: usize = 8;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReminderStats {
    pub scanned: usize,
    pub incomplete: usize,
    pub notified: usize,
    pub failed: usize,
}

/// Reminds every owner of an incomplete profile to finish it.
pub struct ProfileReminder {
    profiles: Arc<dyn ProfileStore>,
    sender: Arc<dyn PushSender>,
}

impl ProfileReminder {
    pub fn new(profiles: Arc<dyn ProfileStore>, sender: Arc<dyn PushSender>) -> Self {
        Self { profiles, sender }
    }

    pub fn build_notification(percent: u32) -> PushNotification {
        PushNotification::new(
            "Complete your Pairent profile!",
            format!(
                "Your profile is {}% complete. Show yourself off by completing your profile!",
                percent
            ),
        )
        .with_data("percentComplete", percent.to_string())
        .with_data("navigateTo", "profile")
    }

    pub async fn run(&self) -> Result<ReminderStats> {
        info!("Running incomplete-profile reminders");
        let profiles = self
            .profiles
            .list_profiles()
            .await
            .context("Failed to list profiles")?;

        let mut stats = ReminderStats {
            scanned: profiles.len(),
            ..Default::default()
        };
        let incomplete: Vec<(Profile, u32)> = profiles
            .into_iter()
            .map(|p| {
                let percent = percent_complete(&p);
                (p, percent)
            })
            .filter(|(_, percent)| *percent < 100)
            .collect();
        stats.incomplete = incomplete.len();

        let outcomes: Vec<Result<usize>> = stream::iter(incomplete)
            .map(|(profile, percent)| async move {
                let notification = Self::build_notification(percent);
                deliver_and_prune(
                    self.sender.as_ref(),
                    self.profiles.as_ref(),
                    &profile.id,
                    &profile.fcm_tokens,
                    &notification,
                )
                .await
            })
            .buffer_unordered(CONCURRENT_REMINDERS)
            .collect()
            .await;

        for outcome in outcomes {
            match outcome {
                Ok(delivered) if delivered > 0 => stats.notified += 1,
                Ok(_) => {}
                Err(e) => {
                    error!("Reminder failed: {:?}", e);
                    stats.failed += 1;
                }
            }
        }

        info!(
            "Reminders done: {} scanned, {} incomplete, {} notified, {} failed",
            stats.scanned, stats.incomplete, stats.notified, stats.failed
        );
        Ok(stats)
    }
}
