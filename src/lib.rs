// src/lib.rs
pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod geo;
pub mod index;
pub mod inquiries;
pub mod models;
pub mod notifications;
pub mod profiles;
pub mod proximity;
pub mod top_picks;

// Re-export common types for easier access
pub use error::{SearchError, StoreError, TopPicksError};
pub use geo::{BoundsPlanner, Coordinate, GeoHashBound};
pub use index::{GeoIndex, InMemoryGeoIndex, ProfileDocument};
pub use models::ProfileId;
pub use proximity::{ProximitySearch, SearchConfig};
pub use top_picks::TopPicksService;
