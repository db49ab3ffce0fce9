// src/index/mod.rs
//
// The geohash-ordered document store the proximity search reads from.

mod memory;
mod postgres;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::geo::Coordinate;
use crate::models::ProfileId;

pub use memory::InMemoryGeoIndex;
pub use postgres::PgGeoIndex;

/// Location attributes stored on a profile. `geo_point` is `None` when the
/// stored coordinates are missing or unusable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileLocation {
    pub geo_point: Option<Coordinate>,
    pub geo_hash: String,
}

/// A profile document as returned by a range scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDocument {
    pub id: ProfileId,
    pub location: ProfileLocation,
}

impl ProfileDocument {
    pub fn new(id: impl Into<String>, geo_point: Option<Coordinate>, geo_hash: impl Into<String>) -> Self {
        Self {
            id: ProfileId(id.into()),
            location: ProfileLocation {
                geo_point,
                geo_hash: geo_hash.into(),
            },
        }
    }
}

/// Read-only range scans over the `geo_hash` field.
#[async_trait]
pub trait GeoIndex: Send + Sync {
    /// Returns every document whose geohash lies in the inclusive range `[start, end]`.
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<ProfileDocument>, StoreError>;
}

#[async_trait]
impl<T: GeoIndex + ?Sized> GeoIndex for Arc<T> {
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<ProfileDocument>, StoreError> {
        (**self).range_scan(start, end).await
    }
}
