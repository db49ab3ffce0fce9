// src/profiles/memory.rs

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{Profile, ProfileStore};
use crate::error::StoreError;
use crate::models::ProfileId;

/// Profile store held in memory, for tests and local runs.
#[derive(Debug, Default)]
pub struct InMemoryProfileStore {
    profiles: RwLock<HashMap<ProfileId, Profile>>,
}

impl InMemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = Profile>) -> Self {
        Self {
            profiles: RwLock::new(profiles.into_iter().map(|p| (p.id.clone(), p)).collect()),
        }
    }

    pub async fn insert(&self, profile: Profile) {
        self.profiles.write().await.insert(profile.id.clone(), profile);
    }
}

#[async_trait]
impl ProfileStore for InMemoryProfileStore {
    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        Ok(self.profiles.read().await.get(id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let mut profiles: Vec<Profile> = self.profiles.read().await.values().cloned().collect();
        profiles.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(profiles)
    }

    async fn list_pending_top_picks(&self, limit: usize) -> Result<Vec<ProfileId>, StoreError> {
        let mut pending: Vec<ProfileId> = self
            .profiles
            .read()
            .await
            .values()
            .filter(|p| !p.top_picks_loaded)
            .map(|p| p.id.clone())
            .collect();
        pending.sort();
        pending.truncate(limit);
        Ok(pending)
    }

    async fn save_top_picks(&self, id: &ProfileId, picks: &[ProfileId]) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", id)))?;
        profile.top_picks = picks.to_vec();
        profile.top_picks_loaded = true;
        Ok(())
    }

    async fn save_fcm_tokens(&self, id: &ProfileId, tokens: &[String]) -> Result<(), StoreError> {
        let mut profiles = self.profiles.write().await;
        let profile = profiles
            .get_mut(id)
            .ok_or_else(|| StoreError::NotFound(format!("profile {}", id)))?;
        profile.fcm_tokens = tokens.to_vec();
        Ok(())
    }
}
