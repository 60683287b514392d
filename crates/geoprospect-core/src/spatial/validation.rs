//! Boundary validation.
//!
//! Upstream never defined a vertex cap or a stance on self-intersecting
//! polygons. The cap is always enforced; self-intersection follows the
//! configured [`ValidityMode`].

use geo::algorithm::line_intersection::{line_intersection, LineIntersection};
use geo::{Area, Coord, Line};
use serde::{Deserialize, Serialize};

use crate::error::{GeoprospectError, Result};
use crate::models::Boundary;

/// Boundary validation mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ValidityMode {
    /// Strict validation - reject self-intersecting or zero-area boundaries
    Strict,
    /// Lenient validation - log the problem and keep the boundary
    #[default]
    Lenient,
}

/// Size limits applied to boundaries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryLimits {
    pub max_vertices: usize,
}

impl Default for BoundaryLimits {
    fn default() -> Self {
        Self { max_vertices: 500 }
    }
}

/// Problem found in a boundary
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationIssue {
    pub location: String,
    pub reason: String,
}

/// Validation result with details
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationResult {
    /// Create a valid result
    pub fn valid() -> Self {
        Self { is_valid: true, issues: Vec::new() }
    }

    /// Add an issue to the result
    pub fn add_issue(&mut self, location: String, reason: String) {
        self.is_valid = false;
        self.issues.push(ValidationIssue { location, reason });
    }
}

/// Validate a boundary against the limits and the validity mode.
///
/// Too many vertices is always an error. Geometric problems are errors in
/// `Strict` mode and are returned as issues (and logged) in `Lenient` mode.
/// Provisional boundaries (fewer than 3 vertices) only get the size check.
pub fn validate_boundary(
    boundary: &Boundary,
    limits: &BoundaryLimits,
    mode: ValidityMode,
) -> Result<ValidationResult> {
    if boundary.len() > limits.max_vertices {
        return Err(GeoprospectError::BoundaryTooLarge {
            vertices: boundary.len(),
            limit: limits.max_vertices,
        });
    }

    let mut result = ValidationResult::valid();
    if !boundary.is_enforceable() {
        return Ok(result);
    }

    if boundary.to_geo_polygon().unsigned_area() == 0.0 {
        result.add_issue("Boundary".to_string(), "Boundary encloses no area".to_string());
    }

    for (a, b) in find_self_intersections(boundary) {
        result.add_issue(format!("Edges {} and {}", a, b), "Boundary edges cross".to_string());
    }

    if result.is_valid {
        return Ok(result);
    }

    match mode {
        ValidityMode::Strict => {
            let first = &result.issues[0];
            Err(GeoprospectError::InvalidBoundary {
                reason: format!("{}: {}", first.location, first.reason),
            })
        }
        ValidityMode::Lenient => {
            for issue in &result.issues {
                tracing::warn!(
                    location = %issue.location,
                    reason = %issue.reason,
                    "Keeping boundary despite validation issue"
                );
            }
            Ok(result)
        }
    }
}

/// Pairs of non-adjacent edge indices that touch or cross.
///
/// Edge `i` runs from vertex `i` to vertex `i + 1` (wrapping to vertex 0).
pub fn find_self_intersections(boundary: &Boundary) -> Vec<(usize, usize)> {
    let points = boundary.points();
    let n = points.len();
    if n < 4 {
        return Vec::new();
    }

    let edges: Vec<Line<f64>> = (0..n)
        .map(|i| {
            let from = points[i];
            let to = points[(i + 1) % n];
            Line::new(
                Coord { x: from.lng(), y: from.lat() },
                Coord { x: to.lng(), y: to.lat() },
            )
        })
        .collect();

    let mut crossings = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            match line_intersection(edges[i], edges[j]) {
                Some(LineIntersection::SinglePoint { .. })
                | Some(LineIntersection::Collinear { .. }) => crossings.push((i, j)),
                None => {}
            }
        }
    }
    crossings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn boundary(points: &[(f64, f64)]) -> Boundary {
        points.iter().map(|&(lat, lng)| Coordinate::new(lat, lng).unwrap()).collect()
    }

    fn square() -> Boundary {
        boundary(&[(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (1.0, 0.0)])
    }

    fn bowtie() -> Boundary {
        boundary(&[(0.0, 0.0), (1.0, 1.0), (0.0, 1.0), (1.0, 0.0)])
    }

    #[test]
    fn test_simple_polygon_is_valid() {
        let result =
            validate_boundary(&square(), &BoundaryLimits::default(), ValidityMode::Strict)
                .unwrap();
        assert!(result.is_valid);
        assert!(find_self_intersections(&square()).is_empty());
    }

    #[test]
    fn test_bowtie_detected() {
        let crossings = find_self_intersections(&bowtie());
        assert_eq!(crossings, vec![(0, 2)]);
    }

    #[test]
    fn test_strict_rejects_bowtie() {
        let err = validate_boundary(&bowtie(), &BoundaryLimits::default(), ValidityMode::Strict)
            .unwrap_err();
        assert!(matches!(err, GeoprospectError::InvalidBoundary { .. }));
    }

    #[test]
    fn test_lenient_keeps_bowtie_with_issues() {
        let result =
            validate_boundary(&bowtie(), &BoundaryLimits::default(), ValidityMode::Lenient)
                .unwrap();
        assert!(!result.is_valid);
        assert!(result.issues.iter().any(|i| i.reason.contains("cross")));
    }

    #[test]
    fn test_collinear_boundary_has_no_area() {
        let line = boundary(&[(0.0, 0.0), (1.0, 1.0), (2.0, 2.0)]);
        let err = validate_boundary(&line, &BoundaryLimits::default(), ValidityMode::Strict)
            .unwrap_err();
        assert!(err.to_string().contains("no area"));
    }

    #[test]
    fn test_vertex_cap_always_enforced() {
        let limits = BoundaryLimits { max_vertices: 3 };
        let err = validate_boundary(&square(), &limits, ValidityMode::Lenient).unwrap_err();
        assert!(matches!(err, GeoprospectError::BoundaryTooLarge { vertices: 4, limit: 3 }));
    }

    #[test]
    fn test_provisional_boundary_skips_geometry_checks() {
        let pair = boundary(&[(0.0, 0.0), (0.0, 0.0)]);
        let result =
            validate_boundary(&pair, &BoundaryLimits::default(), ValidityMode::Strict).unwrap();
        assert!(result.is_valid);
    }
}
