// src/error.rs

use std::time::Duration;

use bb8::RunError;
use thiserror::Error;

/// Failures raised by the Postgres-backed stores (profiles, inquiries, geo index).
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database pool error: {0}")]
    Pool(String),

    #[error("Query execution error: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("Record not found: {0}")]
    NotFound(String),

    #[error("Data conversion error: {0}")]
    Decode(String),
}

impl From<RunError<tokio_postgres::Error>> for StoreError {
    fn from(err: RunError<tokio_postgres::Error>) -> Self {
        match err {
            RunError::User(e) => StoreError::Query(e),
            RunError::TimedOut => StoreError::Pool("timed out waiting for a connection".into()),
        }
    }
}

/// Failures surfaced by a proximity search.
///
/// Candidates with an unusable location are skipped rather than reported, and an
/// empty result is a plain `Ok(vec![])`.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    #[error("Invalid search configuration: {0}")]
    InvalidConfig(String),

    #[error("Geo index unavailable")]
    IndexUnavailable(#[source] StoreError),

    #[error("Search exceeded its deadline of {0:?}")]
    DeadlineExceeded(Duration),
}

/// Failures of the top-picks caller around a search.
#[derive(Debug, Error)]
pub enum TopPicksError {
    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Store(#[from] StoreError),
}
