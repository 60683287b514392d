//! WGS 84 coordinate value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{GeoprospectError, Result};

/// Valid latitude range in degrees
pub const LAT_RANGE: std::ops::RangeInclusive<f64> = -90.0..=90.0;

/// Valid longitude range in degrees
pub const LNG_RANGE: std::ops::RangeInclusive<f64> = -180.0..=180.0;

/// A latitude/longitude pair in decimal degrees.
///
/// Construction always validates the ranges, so every `Coordinate` in the
/// system is a real position. Deserialization goes through the same check.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    /// Create a coordinate, rejecting out-of-range or non-finite values
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if is_valid_lat(lat) && is_valid_lng(lng) {
            Ok(Self { lat, lng })
        } else {
            Err(GeoprospectError::InvalidCoordinate { lat, lng })
        }
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Fixed 5-decimal form used inside prompts, e.g. `-8.50000, 115.00000`.
    ///
    /// Prompts must be byte-stable for a given coordinate.
    pub fn format_for_prompt(&self) -> String {
        format!("{:.5}, {:.5}", self.lat, self.lng)
    }

    /// `[lng, lat]` pair as used by GeoJSON and the `geo` crate
    pub fn to_xy(&self) -> [f64; 2] {
        [self.lng, self.lat]
    }

    /// Build without validation. Callers guarantee the ranges hold.
    pub(crate) fn from_valid(lat: f64, lng: f64) -> Self {
        debug_assert!(is_valid_lat(lat) && is_valid_lng(lng));
        Self { lat, lng }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.format_for_prompt())
    }
}

pub fn is_valid_lat(lat: f64) -> bool {
    lat.is_finite() && LAT_RANGE.contains(&lat)
}

pub fn is_valid_lng(lng: f64) -> bool {
    lng.is_finite() && LNG_RANGE.contains(&lng)
}

#[derive(Deserialize)]
struct RawCoordinate {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoprospectError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Coordinate::new(raw.lat, raw.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        let c = Coordinate::new(-8.5, 115.0).unwrap();
        assert_eq!(c.lat(), -8.5);
        assert_eq!(c.lng(), 115.0);
        assert_eq!(c.to_xy(), [115.0, -8.5]);
    }

    #[test]
    fn test_range_edges_are_valid() {
        assert!(Coordinate::new(90.0, 180.0).is_ok());
        assert!(Coordinate::new(-90.0, -180.0).is_ok());
    }

    #[test]
    fn test_out_of_range_rejected() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -180.5).is_err());
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_format_for_prompt() {
        let c = Coordinate::new(1.0 / 3.0, -120.123456789).unwrap();
        assert_eq!(c.format_for_prompt(), "0.33333, -120.12346");
        assert_eq!(c.to_string(), "(0.33333, -120.12346)");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Coordinate = serde_json::from_str(r#"{"lat": 10.5, "lng": 20.5}"#).unwrap();
        assert_eq!(ok, Coordinate::new(10.5, 20.5).unwrap());

        let bad = serde_json::from_str::<Coordinate>(r#"{"lat": 95.0, "lng": 20.5}"#);
        assert!(bad.is_err());
    }
}
