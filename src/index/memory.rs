// src/index/memory.rs

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{GeoIndex, ProfileDocument};
use crate::error::StoreError;
use crate::geo::Coordinate;
use crate::models::ProfileId;

/// Geo index held in memory, ordered by (geo_hash, id).
///
/// Used by the test suites and for local runs without a database.
#[derive(Debug, Default)]
pub struct InMemoryGeoIndex {
    documents: RwLock<BTreeMap<(String, ProfileId), ProfileDocument>>,
}

impl InMemoryGeoIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_documents(documents: impl IntoIterator<Item = ProfileDocument>) -> Self {
        let map = documents
            .into_iter()
            .map(|doc| ((doc.location.geo_hash.clone(), doc.id.clone()), doc))
            .collect();
        Self {
            documents: RwLock::new(map),
        }
    }

    /// Builds a document for `id` at the given point, encoding its geohash at 10 characters.
    pub fn document_at(id: &str, point: Coordinate) -> Result<ProfileDocument, StoreError> {
        let geo_hash = geohash::encode(point.to_geo_coord(), 10)
            .map_err(|e| StoreError::Decode(format!("geohash for {}: {}", id, e)))?;
        Ok(ProfileDocument::new(id, Some(point), geo_hash))
    }

    pub async fn insert(&self, document: ProfileDocument) {
        let mut documents = self.documents.write().await;
        documents.retain(|(_, id), _| *id != document.id);
        documents.insert(
            (document.location.geo_hash.clone(), document.id.clone()),
            document,
        );
    }

    pub async fn remove(&self, id: &ProfileId) -> bool {
        let mut documents = self.documents.write().await;
        let before = documents.len();
        documents.retain(|(_, doc_id), _| doc_id != id);
        documents.len() != before
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl GeoIndex for InMemoryGeoIndex {
    async fn range_scan(&self, start: &str, end: &str) -> Result<Vec<ProfileDocument>, StoreError> {
        let documents = self.documents.read().await;
        Ok(documents
            .range((start.to_string(), ProfileId(String::new()))..)
            .take_while(|((hash, _), _)| hash.as_str() <= end)
            .map(|(_, doc)| doc.clone())
            .collect())
    }
}
