use serde::{Deserialize, Serialize};

use super::{Boundary, Coordinate};

/// The resolved subject of an analysis run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Target {
    /// A single selected location
    Point { coordinate: Coordinate },
    /// An enforced boundary, addressed through its centroid
    Area { boundary: Boundary, centroid: Coordinate },
}

impl Target {
    /// Resolve the target from the current selection.
    ///
    /// An enforceable boundary (3+ vertices) wins over a selected point and is
    /// reduced to its arithmetic-mean centroid. A provisional boundary is ignored.
    pub fn resolve(selected_point: Option<Coordinate>, boundary: &Boundary) -> Option<Self> {
        if boundary.is_enforceable() {
            let centroid = boundary.centroid()?;
            return Some(Target::Area { boundary: boundary.clone(), centroid });
        }
        selected_point.map(|coordinate| Target::Point { coordinate })
    }

    /// The point used to address the target
    pub fn center(&self) -> Coordinate {
        match self {
            Target::Point { coordinate } => *coordinate,
            Target::Area { centroid, .. } => *centroid,
        }
    }

    /// The enforced boundary, if the target is an area
    pub fn boundary(&self) -> Option<&Boundary> {
        match self {
            Target::Point { .. } => None,
            Target::Area { boundary, .. } => Some(boundary),
        }
    }

    /// Human-readable description of the resolved point
    pub fn describe(&self) -> String {
        match self {
            Target::Point { coordinate } => {
                format!("coordinates {}", coordinate.format_for_prompt())
            }
            Target::Area { boundary, centroid } => format!(
                "the {}-vertex area centred on {}",
                boundary.len(),
                centroid.format_for_prompt()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    #[test]
    fn test_boundary_wins_over_point() {
        let boundary = Boundary::new(vec![c(1.0, 1.0), c(1.0, 2.0), c(2.0, 1.5)]);
        let target = Target::resolve(Some(c(50.0, 50.0)), &boundary).unwrap();

        assert!(target.boundary().is_some());
        assert!((target.center().lat() - 4.0 / 3.0).abs() < 1e-12);
        assert!(target.describe().contains("3-vertex area"));
    }

    #[test]
    fn test_provisional_boundary_falls_back_to_point() {
        let boundary = Boundary::new(vec![c(1.0, 1.0), c(1.0, 2.0)]);
        let target = Target::resolve(Some(c(-8.5, 115.0)), &boundary).unwrap();

        assert_eq!(target.center(), c(-8.5, 115.0));
        assert!(target.boundary().is_none());
        assert_eq!(target.describe(), "coordinates -8.50000, 115.00000");
    }

    #[test]
    fn test_nothing_selected() {
        assert!(Target::resolve(None, &Boundary::default()).is_none());
    }
}
