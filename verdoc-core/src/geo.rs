//! Geospatial point representation and distance math.
//!
//! Documents store locations as GeoJSON `Point` values (`type` plus a
//! `[longitude, latitude]` coordinate pair), the shape geospatial indexes
//! operate on. The [`near`](crate::query::Filter::near) query filter takes a
//! [`GeoPoint`] and a maximum distance in meters.

use serde::{Deserialize, Serialize};

/// Mean earth radius in meters, used for great-circle distance.
const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

fn point_type() -> String {
    "Point".to_string()
}

/// A GeoJSON `Point`: a longitude/latitude coordinate pair on the earth's surface.
///
/// Serializes to the GeoJSON structure expected by geospatial indexes:
///
/// ```json
/// { "type": "Point", "coordinates": [-73.97, 40.77] }
/// ```
///
/// # Example
///
/// ```ignore
/// use verdoc::geo::GeoPoint;
///
/// let central_park = GeoPoint::new(-73.97, 40.77);
/// assert_eq!(central_park.longitude(), -73.97);
/// assert_eq!(central_park.latitude(), 40.77);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    #[serde(rename = "type", default = "point_type")]
    kind: String,
    coordinates: [f64; 2],
}

impl GeoPoint {
    /// Creates a point from a longitude/latitude pair (GeoJSON coordinate order).
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            kind: point_type(),
            coordinates: [longitude, latitude],
        }
    }

    /// Returns the longitude (first GeoJSON coordinate).
    pub fn longitude(&self) -> f64 {
        self.coordinates[0]
    }

    /// Returns the latitude (second GeoJSON coordinate).
    pub fn latitude(&self) -> f64 {
        self.coordinates[1]
    }

    /// Great-circle distance to another point in meters, via the haversine formula.
    pub fn distance_meters(&self, other: &GeoPoint) -> f64 {
        let lat1 = self.latitude().to_radians();
        let lat2 = other.latitude().to_radians();
        let dlat = (other.latitude() - self.latitude()).to_radians();
        let dlon = (other.longitude() - self.longitude()).to_radians();

        let a = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

        EARTH_RADIUS_METERS * c
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_to_self_is_zero() {
        let point = GeoPoint::new(-73.97, 40.77);
        assert_eq!(point.distance_meters(&point), 0.0);
    }

    #[test]
    fn distance_between_nearby_manhattan_points() {
        let central_park = GeoPoint::new(-73.97, 40.77);
        let query_point = GeoPoint::new(-73.9667, 40.78);

        let distance = central_park.distance_meters(&query_point);
        assert!((1_000.0..1_300.0).contains(&distance), "got {distance}");
    }

    #[test]
    fn serializes_to_geojson_shape() {
        let point = GeoPoint::new(-73.97, 40.77);
        let json = serde_json::to_value(&point).unwrap();

        assert_eq!(json["type"], "Point");
        assert_eq!(json["coordinates"][0], -73.97);
        assert_eq!(json["coordinates"][1], 40.77);
    }
}
