// src/geo/bounds.rs
//
// Geohash query bounds covering a circle. Each bound is an inclusive
// [start, end] range over the string-ordered geo_hash field.

use log::trace;
use serde::Serialize;

use super::Coordinate;
use crate::error::SearchError;

const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";
const BITS_PER_CHAR: i64 = 5;
// The encoder tops out at 12 characters.
const MAXIMUM_BITS_PRECISION: i64 = 12 * BITS_PER_CHAR;

const EARTH_EQ_RADIUS: f64 = 6_378_137.0;
const EARTH_MERI_CIRCUMFERENCE: f64 = 40_007_860.0;
const METERS_PER_DEGREE_LATITUDE: f64 = 110_574.0;
const E2: f64 = 0.00669447819799;
const EPSILON: f64 = 1e-12;

/// One inclusive range scan over the geohash field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeoHashBound {
    pub start: String,
    pub end: String,
}

impl GeoHashBound {
    pub fn contains(&self, geo_hash: &str) -> bool {
        self.start.as_str() <= geo_hash && geo_hash <= self.end.as_str()
    }
}

/// Plans the set of geohash ranges whose union covers a circle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BoundsPlanner;

impl BoundsPlanner {
    pub fn new() -> Self {
        Self
    }

    /// Returns the deduplicated bounds covering every point within `radius_m` of `center`.
    ///
    /// The cell precision is picked so one cell is at least as large as the radius,
    /// then the cells under the center and the eight corners/edges of the bounding
    /// box are converted into ranges.
    pub fn plan(
        &self,
        center: &Coordinate,
        radius_m: f64,
    ) -> Result<Vec<GeoHashBound>, SearchError> {
        if !radius_m.is_finite() || radius_m <= 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "radius must be positive, got {}",
                radius_m
            )));
        }

        let query_bits = bounding_box_bits(center, radius_m).max(1);
        let precision = precision_for_bits(query_bits);

        let mut bounds: Vec<GeoHashBound> = Vec::with_capacity(9);
        for (lat, lon) in bounding_box_coordinates(center, radius_m) {
            let hash = geohash::encode(geo::Coord { x: lon, y: lat }, precision).map_err(|_| {
                SearchError::InvalidCoordinate {
                    latitude: lat,
                    longitude: lon,
                }
            })?;
            let bound = geohash_query(&hash, query_bits);
            if !bounds.contains(&bound) {
                bounds.push(bound);
            }
        }

        trace!(
            "Planned {} bounds at {} bits for radius {}m around ({}, {})",
            bounds.len(),
            query_bits,
            radius_m,
            center.latitude(),
            center.longitude()
        );
        Ok(bounds)
    }
}

fn precision_for_bits(bits: i64) -> usize {
    ((bits + BITS_PER_CHAR - 1) / BITS_PER_CHAR) as usize
}

fn meters_to_longitude_degrees(distance: f64, latitude: f64) -> f64 {
    let radians = latitude.to_radians();
    let num = radians.cos() * EARTH_EQ_RADIUS * std::f64::consts::PI / 180.0;
    let denom = 1.0 / (1.0 - E2 * radians.sin() * radians.sin()).sqrt();
    let delta_deg = num * denom;
    if delta_deg < EPSILON {
        if distance > 0.0 {
            360.0
        } else {
            0.0
        }
    } else {
        (distance / delta_deg).min(360.0)
    }
}

fn longitude_bits_for_resolution(resolution: f64, latitude: f64) -> f64 {
    let degs = meters_to_longitude_degrees(resolution, latitude);
    if degs.abs() > 0.000001 {
        (360.0 / degs).log2().max(1.0)
    } else {
        1.0
    }
}

fn latitude_bits_for_resolution(resolution: f64) -> f64 {
    (EARTH_MERI_CIRCUMFERENCE / 2.0 / resolution)
        .log2()
        .min(MAXIMUM_BITS_PRECISION as f64)
}

pub(crate) fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        return longitude;
    }
    let adjusted = longitude + 180.0;
    if adjusted > 0.0 {
        (adjusted % 360.0) - 180.0
    } else {
        180.0 - (-adjusted % 360.0)
    }
}

fn bounding_box_bits(center: &Coordinate, size: f64) -> i64 {
    let lat_delta_degrees = size / METERS_PER_DEGREE_LATITUDE;
    let latitude_north = (center.latitude() + lat_delta_degrees).min(90.0);
    let latitude_south = (center.latitude() - lat_delta_degrees).max(-90.0);
    let bits_lat = latitude_bits_for_resolution(size).floor() as i64 * 2;
    let bits_long_north =
        longitude_bits_for_resolution(size, latitude_north).floor() as i64 * 2 - 1;
    let bits_long_south =
        longitude_bits_for_resolution(size, latitude_south).floor() as i64 * 2 - 1;
    bits_lat
        .min(bits_long_north)
        .min(bits_long_south)
        .min(MAXIMUM_BITS_PRECISION)
}

fn bounding_box_coordinates(center: &Coordinate, radius: f64) -> [(f64, f64); 9] {
    let lat_degrees = radius / METERS_PER_DEGREE_LATITUDE;
    let (lat, lon) = (center.latitude(), center.longitude());
    let latitude_north = (lat + lat_degrees).min(90.0);
    let latitude_south = (lat - lat_degrees).max(-90.0);
    let long_degs = meters_to_longitude_degrees(radius, latitude_north)
        .max(meters_to_longitude_degrees(radius, latitude_south));
    let west = wrap_longitude(lon - long_degs);
    let east = wrap_longitude(lon + long_degs);
    [
        (lat, lon),
        (lat, west),
        (lat, east),
        (latitude_north, lon),
        (latitude_north, west),
        (latitude_north, east),
        (latitude_south, lon),
        (latitude_south, west),
        (latitude_south, east),
    ]
}

/// Turns an encoded cell into the range of all hashes sharing its leading `bits` bits.
pub(crate) fn geohash_query(geo_hash: &str, bits: i64) -> GeoHashBound {
    let precision = precision_for_bits(bits);
    if geo_hash.len() < precision {
        return GeoHashBound {
            start: geo_hash.to_string(),
            end: format!("{}~", geo_hash),
        };
    }
    let ghash = &geo_hash[..precision];
    let base = &ghash[..ghash.len() - 1];
    let last_char = ghash.as_bytes()[ghash.len() - 1];
    let last_value = BASE32
        .iter()
        .position(|&c| c == last_char)
        .unwrap_or(0) as i64;
    let significant_bits = bits - (base.len() as i64 * BITS_PER_CHAR);
    let unused_bits = BITS_PER_CHAR - significant_bits;

    let start_value = (last_value >> unused_bits) << unused_bits;
    let end_value = start_value + (1 << unused_bits);
    let start = format!("{}{}", base, BASE32[start_value as usize] as char);
    let end = if end_value > 31 {
        format!("{}~", base)
    } else {
        format!("{}{}", base, BASE32[end_value as usize] as char)
    };
    GeoHashBound { start, end }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_of(lat: f64, lon: f64) -> String {
        geohash::encode(geo::Coord { x: lon, y: lat }, 10).unwrap()
    }

    fn assert_covered(bounds: &[GeoHashBound], lat: f64, lon: f64) {
        let hash = hash_of(lat, lon);
        assert!(
            bounds.iter().any(|b| b.contains(&hash)),
            "({}, {}) with hash {} not covered by {:?}",
            lat,
            lon,
            hash,
            bounds
        );
    }

    #[test]
    fn query_masks_unused_bits_of_last_char() {
        let bound = geohash_query("9q8yyk", 27);
        assert_eq!(bound.start, "9q8yyh");
        assert_eq!(bound.end, "9q8yys");
    }

    #[test]
    fn query_end_overflows_to_tilde() {
        let bound = geohash_query("9q8yyz", 27);
        assert_eq!(bound.start, "9q8yys");
        assert_eq!(bound.end, "9q8yy~");
    }

    #[test]
    fn short_hash_spans_every_extension() {
        let bound = geohash_query("9q", 27);
        assert_eq!(bound.start, "9q");
        assert_eq!(bound.end, "9q~");
    }

    #[test]
    fn wraps_longitudes_into_range() {
        assert_eq!(wrap_longitude(10.0), 10.0);
        assert!((wrap_longitude(190.0) - -170.0).abs() < 1e-9);
        assert!((wrap_longitude(-190.0) - 170.0).abs() < 1e-9);
    }

    #[test]
    fn rejects_non_positive_radius() {
        let center = Coordinate::new(0.0, 0.0).unwrap();
        assert!(BoundsPlanner::new().plan(&center, 0.0).is_err());
        assert!(BoundsPlanner::new().plan(&center, -5.0).is_err());
        assert!(BoundsPlanner::new().plan(&center, f64::NAN).is_err());
    }

    #[test]
    fn bounds_are_deduplicated_and_ordered() {
        let center = Coordinate::new(37.7749, -122.4194).unwrap();
        for radius in [1_000.0, 10_000.0, 25_000.0, 50_000.0, 100_000.0] {
            let bounds = BoundsPlanner::new().plan(&center, radius).unwrap();
            assert!(!bounds.is_empty() && bounds.len() <= 9);
            for (i, b) in bounds.iter().enumerate() {
                assert!(b.start < b.end, "bad range {:?}", b);
                assert!(!bounds[..i].contains(b));
            }
        }
    }

    #[test]
    fn bounds_cover_points_inside_radius() {
        let (lat, lon) = (37.7749, -122.4194);
        let center = Coordinate::new(lat, lon).unwrap();
        for radius in [1_000.0, 10_000.0, 100_000.0] {
            let bounds = BoundsPlanner::new().plan(&center, radius).unwrap();
            let dlat = 0.9 * radius / 111_195.0;
            let dlon = dlat / lat.to_radians().cos();
            assert_covered(&bounds, lat, lon);
            for (sy, sx) in [(1.0, 0.0), (-1.0, 0.0), (0.0, 1.0), (0.0, -1.0)] {
                assert_covered(&bounds, lat + sy * dlat, lon + sx * dlon);
            }
            for (sy, sx) in [(0.6, 0.6), (0.6, -0.6), (-0.6, 0.6), (-0.6, -0.6)] {
                assert_covered(&bounds, lat + sy * dlat, lon + sx * dlon);
            }
        }
    }

    #[test]
    fn tiny_radius_is_capped_at_twelve_characters() {
        let center = Coordinate::new(48.8566, 2.3522).unwrap();
        let bounds = BoundsPlanner::new().plan(&center, 0.001).unwrap();
        assert_eq!(bounding_box_bits(&center, 0.001), MAXIMUM_BITS_PRECISION);
        assert!(bounds.iter().all(|b| b.start.len() == 12));
        let full = geohash::encode(geo::Coord { x: 2.3522, y: 48.8566 }, 12).unwrap();
        assert!(bounds.iter().any(|b| b.contains(&full)));
    }

    #[test]
    fn coarser_cells_for_larger_radius() {
        let center = Coordinate::new(51.5074, -0.1278).unwrap();
        let small = BoundsPlanner::new().plan(&center, 1_000.0).unwrap();
        let large = BoundsPlanner::new().plan(&center, 100_000.0).unwrap();
        assert!(small[0].start.len() > large[0].start.len());
    }

    #[test]
    fn handles_the_antimeridian() {
        let center = Coordinate::new(0.0, 179.99).unwrap();
        let bounds = BoundsPlanner::new().plan(&center, 10_000.0).unwrap();
        assert_covered(&bounds, 0.0, 179.99);
        assert_covered(&bounds, 0.0, -179.99);
    }
}
