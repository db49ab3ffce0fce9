// src/geo/distance.rs

use super::Coordinate;

/// Calculate the Haversine distance between two points in meters
pub fn calculate_haversine_distance(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    const EARTH_RADIUS: f64 = 6371000.0; // Earth radius in meters

    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let dlat = lat2_rad - lat1_rad;
    let dlon = (lon2 - lon1).to_radians();

    let a =
        (dlat / 2.0).sin().powi(2) + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS * c
}

/// Great-circle distance between two coordinates, in meters.
pub fn distance_between(a: &Coordinate, b: &Coordinate) -> f64 {
    calculate_haversine_distance(a.latitude(), a.longitude(), b.latitude(), b.longitude())
}
