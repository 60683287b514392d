//! Spatial primitives: centroid math and boundary validation.

pub mod validation;

pub use validation::{
    find_self_intersections, validate_boundary, BoundaryLimits, ValidationIssue,
    ValidationResult, ValidityMode,
};

use crate::models::Coordinate;

/// Arithmetic mean of latitudes and of longitudes.
///
/// Returns `None` for an empty slice. The mean of valid coordinates is always
/// a valid coordinate, so no range check is needed on the result.
pub fn centroid(points: &[Coordinate]) -> Option<Coordinate> {
    if points.is_empty() {
        return None;
    }

    let n = points.len() as f64;
    let (lat_sum, lng_sum) =
        points.iter().fold((0.0, 0.0), |(lat, lng), p| (lat + p.lat(), lng + p.lng()));

    // Clamp guards against float drift at the range edges
    let lat = (lat_sum / n).clamp(-90.0, 90.0);
    let lng = (lng_sum / n).clamp(-180.0, 180.0);
    Some(Coordinate::from_valid(lat, lng))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Boundary;
    use proptest::prelude::*;

    #[test]
    fn test_centroid_scenario() {
        let points = vec![
            Coordinate::new(1.0, 1.0).unwrap(),
            Coordinate::new(1.0, 2.0).unwrap(),
            Coordinate::new(2.0, 1.5).unwrap(),
        ];
        let c = centroid(&points).unwrap();
        assert!((c.lat() - 1.333_333_333).abs() < 1e-9);
        assert!((c.lng() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_centroid_single_point() {
        let p = Coordinate::new(-33.9, 18.4).unwrap();
        assert_eq!(centroid(&[p]), Some(p));
    }

    #[test]
    fn test_centroid_empty() {
        assert_eq!(centroid(&[]), None);
    }

    fn arb_coordinate() -> impl Strategy<Value = Coordinate> {
        (-90.0f64..=90.0, -180.0f64..=180.0)
            .prop_map(|(lat, lng)| Coordinate::new(lat, lng).unwrap())
    }

    proptest! {
        #[test]
        fn prop_centroid_inside_bounding_box(points in prop::collection::vec(arb_coordinate(), 1..64)) {
            let boundary = Boundary::new(points);
            let c = boundary.centroid().unwrap();
            let bbox = boundary.bounding_box().unwrap();

            // Allow for accumulated rounding in the mean
            let eps = 1e-9;
            prop_assert!(c.lat() >= bbox.min_lat - eps && c.lat() <= bbox.max_lat + eps);
            prop_assert!(c.lng() >= bbox.min_lng - eps && c.lng() <= bbox.max_lng + eps);
        }
    }
}
