// src/top_picks.rs
//
// Callers of the proximity search: compute a profile's nearby list and, for
// the event path, write it back onto the profile.

use log::{error, info, warn};
use std::sync::Arc;

use crate::error::TopPicksError;
use crate::index::GeoIndex;
use crate::models::ProfileId;
use crate::profiles::ProfileStore;
use crate::proximity::{ProximitySearch, SearchConfig};

pub struct TopPicksService {
    profiles: Arc<dyn ProfileStore>,
    search: ProximitySearch<Arc<dyn GeoIndex>>,
}

impl TopPicksService {
    pub fn new(
        profiles: Arc<dyn ProfileStore>,
        index: Arc<dyn GeoIndex>,
        config: SearchConfig,
    ) -> Self {
        Self {
            profiles,
            search: ProximitySearch::new(index, config),
        }
    }

    /// Ranked nearby ids for a stored profile, without persisting anything.
    ///
    /// A profile without a usable location has no neighbours.
    pub async fn nearby_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ProfileId>, TopPicksError> {
        let profile = self
            .profiles
            .get_profile(profile_id)
            .await?
            .ok_or_else(|| TopPicksError::ProfileNotFound(profile_id.to_string()))?;

        let Some(center) = profile.location.and_then(|l| l.geo_point) else {
            warn!("Profile {} has no usable location; no top picks", profile_id);
            return Ok(Vec::new());
        };
        Ok(self.search.find_nearby(&center, profile_id).await?)
    }

    /// Recomputes and stores `{top_picks, top_picks_loaded: true}`.
    ///
    /// The write is unconditional: top picks are derived data and a concurrent
    /// writer simply wins.
    pub async fn refresh_for_profile(
        &self,
        profile_id: &ProfileId,
    ) -> Result<Vec<ProfileId>, TopPicksError> {
        let picks = self.nearby_for_profile(profile_id).await?;
        self.profiles.save_top_picks(profile_id, &picks).await?;
        info!("Stored {} top picks for profile {}", picks.len(), profile_id);
        Ok(picks)
    }

    /// Event entry point for a profile without top picks. Failures are logged
    /// and leave the profile untouched, so it stays pending. Returns whether
    /// the picks were stored.
    pub async fn on_profile_created(&self, profile_id: &ProfileId) -> bool {
        match self.refresh_for_profile(profile_id).await {
            Ok(_) => true,
            Err(e) => {
                error!("Failed to compute top picks for profile {}: {:?}", profile_id, e);
                false
            }
        }
    }

    /// Processes up to `limit` profiles whose top picks were never computed.
    /// Returns how many were stored successfully.
    pub async fn refresh_pending(&self, limit: usize) -> Result<usize, TopPicksError> {
        let pending = self.profiles.list_pending_top_picks(limit).await?;
        info!("Refreshing top picks for {} pending profiles", pending.len());
        let mut refreshed = 0;
        for profile_id in &pending {
            if self.on_profile_created(profile_id).await {
                refreshed += 1;
            }
        }
        Ok(refreshed)
    }
}
