// src/index/postgres.rs

use async_trait::async_trait;
use log::debug;

use super::{GeoIndex, ProfileDocument, ProfileLocation};
use crate::db::PgPool;
use crate::error::StoreError;
use crate::geo::Coordinate;
use crate::models::ProfileId;

// geo_hash is declared COLLATE "C" so comparisons follow byte order.
const RANGE_SCAN_SQL: &str = "
    SELECT id, geo_hash, latitude, longitude
    FROM profiles
    WHERE geo_hash >= $1 AND geo_hash <= $2
    ORDER BY geo_hash
";

/// Geo index backed by the `profiles` table.
#[derive(Clone)]
pub struct PgGeoIndex {
    pool: PgPool,
}

impl PgGeoIndex {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl GeoIndex for PgGeoIndex {
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<ProfileDocument>, StoreError> {
        let conn = self.pool.get().await?;
        let rows = conn.query(RANGE_SCAN_SQL, &[&start, &end]).await?;

        let mut documents = Vec::with_capacity(rows.len());
        for row in &rows {
            let id: ProfileId = row.try_get("id")?;
            let geo_hash: String = row.try_get("geo_hash")?;
            let latitude: Option<f64> = row.try_get("latitude")?;
            let longitude: Option<f64> = row.try_get("longitude")?;
            let geo_point = match (latitude, longitude) {
                (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
                _ => None,
            };
            if geo_point.is_none() {
                debug!("Profile {} has no usable geo_point", id);
            }
            documents.push(ProfileDocument {
                id,
                location: ProfileLocation {
                    geo_point,
                    geo_hash,
                },
            });
        }
        Ok(documents)
    }
}
