//! Geographic coordinates and great-circle distance.

use std::fmt;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// A WGS84 latitude/longitude pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Create a coordinate pair.
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Parse a `"lat,lon"` query string.
    ///
    /// Returns `None` for anything that isn't two finite numbers within
    /// WGS84 bounds, so free-text queries fall through cleanly.
    ///
    /// # Examples
    ///
    /// ```
    /// use waypoint_planner::domain::Coordinates;
    ///
    /// let c = Coordinates::parse_query("48.853000,2.369000").unwrap();
    /// assert_eq!(c.lat, 48.853);
    /// assert!(Coordinates::parse_query("Place de la Nation").is_none());
    /// ```
    pub fn parse_query(query: &str) -> Option<Self> {
        let (lat, lon) = query.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;

        if !lat.is_finite() || !lon.is_finite() {
            return None;
        }
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }

        Some(Self { lat, lon })
    }

    /// Format as a location query, six decimal places each.
    pub fn to_query(&self) -> String {
        format!("{:.6},{:.6}", self.lat, self.lon)
    }

    /// Great-circle distance to `other` in metres.
    pub fn distance_to(&self, other: &Coordinates) -> f64 {
        haversine_m(self, other)
    }
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lon)
    }
}

/// Haversine distance between two points in metres.
pub fn haversine_m(a: &Coordinates, b: &Coordinates) -> f64 {
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + a.lat.to_radians().cos() * b.lat.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());
    EARTH_RADIUS_M * c
}

/// Rounded haversine distance, or 0 unless both endpoints are known.
pub fn leg_distance_m(from: Option<&Coordinates>, to: Option<&Coordinates>) -> u32 {
    match (from, to) {
        (Some(a), Some(b)) => haversine_m(a, b).round() as u32,
        _ => 0,
    }
}
