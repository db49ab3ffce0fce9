// src/profiles/postgres.rs

use async_trait::async_trait;
use log::debug;
use tokio_postgres::Row;

use super::{Profile, ProfileStore};
use crate::db::PgPool;
use crate::error::StoreError;
use crate::geo::Coordinate;
use crate::index::ProfileLocation;
use crate::models::ProfileId;

const PROFILE_COLUMNS: &str =
    "id, geo_hash, latitude, longitude, data, fcm_tokens, top_picks, top_picks_loaded";

/// Profile store backed by the `profiles` table.
#[derive(Clone)]
pub struct PgProfileStore {
    pool: PgPool,
}

impl PgProfileStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn profile_from_row(row: &Row) -> Result<Profile, StoreError> {
    let id: ProfileId = row.try_get("id")?;
    let geo_hash: Option<String> = row.try_get("geo_hash")?;
    let latitude: Option<f64> = row.try_get("latitude")?;
    let longitude: Option<f64> = row.try_get("longitude")?;
    let geo_point = match (latitude, longitude) {
        (Some(lat), Some(lon)) => Coordinate::new(lat, lon).ok(),
        _ => None,
    };
    let location = geo_hash.map(|geo_hash| ProfileLocation {
        geo_point,
        geo_hash,
    });

    Ok(Profile {
        id,
        location,
        data: row.try_get("data")?,
        fcm_tokens: row.try_get("fcm_tokens")?,
        top_picks: row.try_get("top_picks")?,
        top_picks_loaded: row.try_get("top_picks_loaded")?,
    })
}

#[async_trait]
impl ProfileStore for PgProfileStore {
    async fn get_profile(&self, id: &ProfileId) -> Result<Option<Profile>, StoreError> {
        let conn = self.pool.get().await?;
        let query = format!("SELECT {} FROM profiles WHERE id = $1", PROFILE_COLUMNS);
        let row = conn.query_opt(query.as_str(), &[id]).await?;
        row.as_ref().map(profile_from_row).transpose()
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, StoreError> {
        let conn = self.pool.get().await?;
        let query = format!("SELECT {} FROM profiles ORDER BY id", PROFILE_COLUMNS);
        let rows = conn.query(query.as_str(), &[]).await?;
        debug!("Loaded {} profiles", rows.len());
        rows.iter().map(profile_from_row).collect()
    }

    async fn list_pending_top_picks(&self, limit: usize) -> Result<Vec<ProfileId>, StoreError> {
        let conn = self.pool.get().await?;
        let rows = conn
            .query(
                "SELECT id FROM profiles
                 WHERE top_picks_loaded = FALSE
                 ORDER BY created_at
                 LIMIT $1",
                &[&(limit as i64)],
            )
            .await?;
        rows.iter()
            .map(|row| row.try_get::<_, ProfileId>("id").map_err(StoreError::from))
            .collect()
    }

    async fn save_top_picks(&self, id: &ProfileId, picks: &[ProfileId]) -> Result<(), StoreError> {
        let conn = self.pool.get().await?;
        let updated = conn
            .execute(
                "UPDATE profiles SET top_picks = $2, top_picks_loaded = TRUE WHERE id = $1",
                &[id, &picks],
            )
            .await?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }

    async fn save_fcm_tokens(&self, id: &ProfileId, tokens: &[String]) -> Result<(), StoreError> {
        let conn = self.pool.get().await?;
        let updated = conn
            .execute(
                "UPDATE profiles SET fcm_tokens = $2 WHERE id = $1",
                &[id, &tokens],
            )
            .await?;
        if updated == 0 {
            return Err(StoreError::NotFound(format!("profile {}", id)));
        }
        Ok(())
    }
}
