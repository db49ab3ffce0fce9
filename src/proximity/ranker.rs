// src/proximity/ranker.rs

use log::debug;
use serde::Serialize;
use std::collections::HashMap;

use crate::geo::{distance_between, Coordinate};
use crate::index::ProfileDocument;
use crate::models::ProfileId;

/// A candidate that survived the exact-distance check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateRecord {
    pub profile_id: ProfileId,
    pub distance_m: f64,
}

/// Drops geohash false positives and orders the rest by true distance.
#[derive(Debug, Clone, Copy)]
pub struct DistanceFilterRanker {
    ceiling_m: f64,
}

impl DistanceFilterRanker {
    /// `ceiling_m` is applied to every candidate regardless of the tier it came from.
    pub fn new(ceiling_m: f64) -> Self {
        Self { ceiling_m }
    }

    pub fn ceiling_m(&self) -> f64 {
        self.ceiling_m
    }

    /// Ordered profile ids, nearest first, never including `self_id`.
    pub fn rank(
        &self,
        raw_candidates: Vec<ProfileDocument>,
        center: &Coordinate,
        self_id: &ProfileId,
    ) -> Vec<ProfileId> {
        self.rank_records(raw_candidates, center, self_id)
            .into_iter()
            .map(|record| record.profile_id)
            .collect()
    }

    /// Same as [`rank`](Self::rank) but keeps the computed distances.
    ///
    /// Ties on distance are broken by id so the output is reproducible. A
    /// profile returned by more than one bound is kept once.
    pub fn rank_records(
        &self,
        raw_candidates: Vec<ProfileDocument>,
        center: &Coordinate,
        self_id: &ProfileId,
    ) -> Vec<CandidateRecord> {
        let raw_count = raw_candidates.len();
        let mut missing_location = 0usize;
        let mut false_positives = 0usize;
        let mut nearest: HashMap<ProfileId, f64> = HashMap::with_capacity(raw_count);

        for doc in raw_candidates {
            let Some(point) = doc.location.geo_point else {
                missing_location += 1;
                continue;
            };
            let distance_m = distance_between(&point, center);
            if distance_m > self.ceiling_m {
                false_positives += 1;
                continue;
            }
            nearest
                .entry(doc.id)
                .and_modify(|d| *d = d.min(distance_m))
                .or_insert(distance_m);
        }

        let mut records: Vec<CandidateRecord> = nearest
            .into_iter()
            .map(|(profile_id, distance_m)| CandidateRecord {
                profile_id,
                distance_m,
            })
            .collect();
        records.sort_by(|a, b| {
            a.distance_m
                .total_cmp(&b.distance_m)
                .then_with(|| a.profile_id.cmp(&b.profile_id))
        });
        records.retain(|record| &record.profile_id != self_id);

        debug!(
            "Ranked {} of {} raw candidates ({} without location, {} beyond {}m)",
            records.len(),
            raw_count,
            missing_location,
            false_positives,
            self.ceiling_m
        );
        records
    }
}
