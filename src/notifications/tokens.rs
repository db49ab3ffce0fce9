// src/notifications/tokens.rs

use anyhow::{Context, Result};
use log::{error, info};
use std::collections::HashSet;

use super::{DeliveryResult, PushNotification, PushSender};
use crate::models::ProfileId;
use crate::profiles::ProfileStore;

/// Error codes meaning a token will never work again.
pub const UNREGISTERED_TOKEN_CODES: [&str; 2] = [
    "messaging/invalid-registration-token",
    "messaging/registration-token-not-registered",
];

/// Tokens still worth keeping after a send. Transient failures keep their token.
pub fn prune_failed_tokens(tokens: &[String], results: &[DeliveryResult]) -> Vec<String> {
    let dead: HashSet<&str> = results
        .iter()
        .filter_map(|r| {
            let code = r.error_code.as_deref()?;
            error!("Problem sending to device with token {}: {}", r.token, code);
            UNREGISTERED_TOKEN_CODES
                .contains(&code)
                .then_some(r.token.as_str())
        })
        .collect();
    tokens
        .iter()
        .filter(|t| !dead.contains(t.as_str()))
        .cloned()
        .collect()
}

/// Sends `notification` to a profile's devices and drops tokens the provider
/// reports as unregistered. Returns the number of successful deliveries.
pub async fn deliver_and_prune(
    sender: &dyn PushSender,
    profiles: &dyn ProfileStore,
    profile_id: &ProfileId,
    tokens: &[String],
    notification: &PushNotification,
) -> Result<usize> {
    if tokens.is_empty() {
        return Ok(0);
    }
    let results = sender
        .send_to_devices(tokens, notification)
        .await
        .with_context(|| format!("Push delivery failed for profile {}", profile_id))?;
    let delivered = results.iter().filter(|r| r.error_code.is_none()).count();

    let still_registered = prune_failed_tokens(tokens, &results);
    if still_registered.len() != tokens.len() {
        info!("Updating fcm tokens for profile {}", profile_id);
        profiles
            .save_fcm_tokens(profile_id, &still_registered)
            .await
            .with_context(|| format!("Failed to update fcm tokens for {}", profile_id))?;
    }
    Ok(delivered)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn removes_only_unregistered_tokens() {
        let sent = tokens(&["a", "b", "c", "d"]);
        let results = vec![
            DeliveryResult::delivered("a"),
            DeliveryResult::failed("b", "messaging/registration-token-not-registered"),
            DeliveryResult::failed("c", "messaging/internal-error"),
            DeliveryResult::failed("d", "messaging/invalid-registration-token"),
        ];
        assert_eq!(prune_failed_tokens(&sent, &results), tokens(&["a", "c"]));
    }

    #[test]
    fn keeps_everything_when_all_delivered() {
        let sent = tokens(&["a", "b"]);
        let results = vec![DeliveryResult::delivered("a"), DeliveryResult::delivered("b")];
        assert_eq!(prune_failed_tokens(&sent, &results), sent);
    }
}
