// src/proximity/mod.rs
//
// Nearby-profile search: tiered geohash scans, then exact-distance ranking.

mod config;
mod fetcher;
mod ranker;

use log::info;
use std::time::Instant;

use crate::error::SearchError;
use crate::geo::Coordinate;
use crate::index::GeoIndex;
use crate::models::ProfileId;

pub use config::{
    SearchConfig, DEFAULT_EARLY_STOP_THRESHOLD, DEFAULT_RADIUS_TIERS_M, DEFAULT_SEARCH_DEADLINE,
};
pub use fetcher::{FetchOutcome, TieredCandidateFetcher};
pub use ranker::{CandidateRecord, DistanceFilterRanker};

/// Finds the profiles nearest to a point.
///
/// Holds no per-search state, so one instance can serve concurrent searches.
pub struct ProximitySearch<I> {
    fetcher: TieredCandidateFetcher<I>,
    ranker: DistanceFilterRanker,
}

impl<I: GeoIndex> ProximitySearch<I> {
    pub fn new(index: I, config: SearchConfig) -> Self {
        let ranker = DistanceFilterRanker::new(config.ceiling_m());
        Self {
            fetcher: TieredCandidateFetcher::new(index, config),
            ranker,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        self.fetcher.config()
    }

    /// Ids of the profiles around `center`, nearest first, without `self_id`.
    ///
    /// Returns an empty list when nothing lies within the largest tier. Any
    /// failed scan fails the whole search; nothing partial is returned.
    pub async fn find_nearby(
        &self,
        center: &Coordinate,
        self_id: &ProfileId,
    ) -> Result<Vec<ProfileId>, SearchError> {
        let ranked = self.find_nearby_ranked(center, self_id).await?;
        Ok(ranked.into_iter().map(|record| record.profile_id).collect())
    }

    /// Like [`find_nearby`](Self::find_nearby), keeping the distance of each hit.
    pub async fn find_nearby_ranked(
        &self,
        center: &Coordinate,
        self_id: &ProfileId,
    ) -> Result<Vec<CandidateRecord>, SearchError> {
        let start = Instant::now();
        let outcome = self.fetcher.fetch(center).await?;
        let raw_count = outcome.documents.len();
        let ranked = self.ranker.rank_records(outcome.documents, center, self_id);

        info!(
            "Nearby search for {} finished in {:.2?}: {} ranked from {} raw hits (stopped at {}m after {} tiers, {} scans)",
            self_id,
            start.elapsed(),
            ranked.len(),
            raw_count,
            outcome.radius_m,
            outcome.tiers_scanned,
            outcome.scans_issued
        );
        Ok(ranked)
    }
}
