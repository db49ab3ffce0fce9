// src/geo/mod.rs
//
// Coordinates, exact distances and geohash range planning

mod bounds;
mod coordinate;
mod distance;

pub use bounds::{BoundsPlanner, GeoHashBound};
pub use coordinate::Coordinate;
pub use distance::{calculate_haversine_distance, distance_between};
