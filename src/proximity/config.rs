// src/proximity/config.rs

use std::time::Duration;

use crate::error::SearchError;

/// Radius tiers used when no configuration is supplied, in meters.
pub const DEFAULT_RADIUS_TIERS_M: [f64; 5] = [1_000.0, 10_000.0, 25_000.0, 50_000.0, 100_000.0];

/// Escalation stops once a tier returns more raw hits than this.
pub const DEFAULT_EARLY_STOP_THRESHOLD: usize = 50;

pub const DEFAULT_SEARCH_DEADLINE: Duration = Duration::from_secs(10);

/// Tuning for one proximity search.
///
/// The largest tier doubles as the exact-distance ceiling applied to every
/// candidate, whichever tier produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    radius_tiers_m: Vec<f64>,
    early_stop_threshold: usize,
    deadline: Option<Duration>,
}

impl SearchConfig {
    pub fn new(
        radius_tiers_m: Vec<f64>,
        early_stop_threshold: usize,
        deadline: Option<Duration>,
    ) -> Result<Self, SearchError> {
        if radius_tiers_m.is_empty() {
            return Err(SearchError::InvalidConfig(
                "at least one radius tier is required".into(),
            ));
        }
        if let Some(bad) = radius_tiers_m.iter().find(|r| !r.is_finite() || **r <= 0.0) {
            return Err(SearchError::InvalidConfig(format!(
                "radius tiers must be positive, got {}",
                bad
            )));
        }
        if radius_tiers_m.windows(2).any(|w| w[0] >= w[1]) {
            return Err(SearchError::InvalidConfig(format!(
                "radius tiers must be strictly ascending, got {:?}",
                radius_tiers_m
            )));
        }
        Ok(Self {
            radius_tiers_m,
            early_stop_threshold,
            deadline,
        })
    }

    pub fn radius_tiers_m(&self) -> &[f64] {
        &self.radius_tiers_m
    }

    pub fn early_stop_threshold(&self) -> usize {
        self.early_stop_threshold
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline
    }

    /// Largest configured tier.
    pub fn ceiling_m(&self) -> f64 {
        self.radius_tiers_m
            .last()
            .copied()
            .unwrap_or(DEFAULT_RADIUS_TIERS_M[DEFAULT_RADIUS_TIERS_M.len() - 1])
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            radius_tiers_m: DEFAULT_RADIUS_TIERS_M.to_vec(),
            early_stop_threshold: DEFAULT_EARLY_STOP_THRESHOLD,
            deadline: Some(DEFAULT_SEARCH_DEADLINE),
        }
    }
}
