// src/profiles/mod.rs
//
// Profile records and the store the callers of the proximity search write to.

mod completeness;
mod memory;
mod postgres;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::index::ProfileLocation;
use crate::models::ProfileId;

pub use completeness::{notification_amount, percent_complete};
pub use memory::InMemoryProfileStore;
pub use postgres::PgProfileStore;

/// A profile as stored. Free-form attributes (bio, images, unseen items...) live in `data`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub id: ProfileId,
    pub location: Option<ProfileLocation>,
    #[serde(default)]
    pub data: serde_json::Value,
    #[serde(default)]
    pub fcm_tokens: Vec<String>,
    #[serde(default)]
    pub top_picks: Vec<ProfileId>,
    #[serde(default)]
    pub top_picks_loaded: bool,
}

impl Profile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: ProfileId(id.into()),
            location: None,
            data: serde_json::Value::Object(Default::default()),
            fcm_tokens: Vec::new(),
            top_picks: Vec::new(),
            top_picks_loaded: false,
        }
    }
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError>;

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError>;

    /// Up to `limit` profiles whose top picks have never been computed.
    /// The Postgres store returns them oldest first; the in-memory store by id.
    async fn list_pending_top_picks(&self, limit: usize) -> Result<Vec<ProfileId>, StoreError>;

    /// Overwrites `top_picks` and sets `top_picks_loaded`. Last writer wins.
    async fn save_top_picks(&self, id: &ProfileId, picks: &[ProfileId]) -> Result<(), StoreError>;

    async fn save_fcm_tokens(&self, id: &ProfileId, tokens: &[String]) -> Result<(), StoreError>;
}
