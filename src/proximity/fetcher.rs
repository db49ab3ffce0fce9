// src/proximity/fetcher.rs

use futures::future::try_join_all;
use log::{debug, info};
use std::time::Instant;

use super::SearchConfig;
use crate::error::SearchError;
use crate::geo::{BoundsPlanner, Coordinate};
use crate::index::{GeoIndex, ProfileDocument};

/// Raw hits from the tier where escalation stopped.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    /// Every document returned by the stopping tier's scans, duplicates included.
    pub documents: Vec<ProfileDocument>,
    /// Radius of the stopping tier. Zero when no tier ran.
    pub radius_m: f64,
    pub tiers_scanned: usize,
    /// Range scans issued across all tiers.
    pub scans_issued: usize,
}

/// Scans the geo index tier by tier, widening the radius until the candidate
/// pool is large enough or the tiers run out.
pub struct TieredCandidateFetcher<I> {
    index: I,
    planner: BoundsPlanner,
    config: SearchConfig,
}

impl<I: GeoIndex> TieredCandidateFetcher<I> {
    pub fn new(index: I, config: SearchConfig) -> Self {
        Self {
            index,
            planner: BoundsPlanner::new(),
            config,
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the tiered scan, bounded by the configured deadline.
    pub async fn fetch(&self, center: &Coordinate) -> Result<FetchOutcome, SearchError> {
        match self.config.deadline() {
            Some(deadline) => tokio::time::timeout(deadline, self.fetch_tiers(center))
                .await
                .map_err(|_| SearchError::DeadlineExceeded(deadline))?,
            None => self.fetch_tiers(center).await,
        }
    }

    async fn fetch_tiers(&self, center: &Coordinate) -> Result<FetchOutcome, SearchError> {
        let mut outcome = FetchOutcome::default();

        for (tier_idx, &radius) in self.config.radius_tiers_m().iter().enumerate() {
            let tier_start = Instant::now();
            let bounds = self.planner.plan(center, radius)?;

            // All scans of a tier are in flight together; the tier only
            // resolves once every one of them has returned.
            let scans = bounds
                .iter()
                .map(|bound| self.index.range_scan(&bound.start, &bound.end));
            let snapshots = try_join_all(scans)
                .await
                .map_err(SearchError::IndexUnavailable)?;

            for (bound, snapshot) in bounds.iter().zip(&snapshots) {
                debug!(
                    "Snapshot size for [{}, {}]: {}",
                    bound.start,
                    bound.end,
                    snapshot.len()
                );
            }
            let total: usize = snapshots.iter().map(Vec::len).sum();
            info!(
                "Tier {}/{}: found {} candidates for radius {}m across {} bounds in {:.2?}",
                tier_idx + 1,
                self.config.radius_tiers_m().len(),
                total,
                radius,
                bounds.len(),
                tier_start.elapsed()
            );

            // Each tier replaces the previous one's hits.
            outcome = FetchOutcome {
                documents: snapshots.into_iter().flatten().collect(),
                radius_m: radius,
                tiers_scanned: tier_idx + 1,
                scans_issued: outcome.scans_issued + bounds.len(),
            };

            if total > self.config.early_stop_threshold() {
                debug!(
                    "Early stop at {}m: {} > threshold {}",
                    radius,
                    total,
                    self.config.early_stop_threshold()
                );
                break;
            }
        }

        Ok(outcome)
    }
}
