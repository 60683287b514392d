//! Operator-drawn or imported analysis boundary.

use serde::{Deserialize, Serialize};

use super::Coordinate;
use crate::spatial;

/// Minimum number of vertices for a boundary to be enforced as an area
pub const MIN_ENFORCEABLE_VERTICES: usize = 3;

/// Ordered polygon vertex list.
///
/// Insertion order defines the edges. Fewer than three vertices is a valid
/// provisional point set (e.g. while the operator is still clicking) but is
/// never treated as an area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Boundary {
    points: Vec<Coordinate>,
}

/// Axis-aligned latitude/longitude extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lat: f64,
    pub min_lng: f64,
    pub max_lat: f64,
    pub max_lng: f64,
}

impl BoundingBox {
    /// Check whether a coordinate lies inside the box (edges inclusive)
    pub fn contains(&self, coordinate: &Coordinate) -> bool {
        (self.min_lat..=self.max_lat).contains(&coordinate.lat())
            && (self.min_lng..=self.max_lng).contains(&coordinate.lng())
    }
}

impl Boundary {
    pub fn new(points: Vec<Coordinate>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Append a vertex (map click)
    pub fn push(&mut self, point: Coordinate) {
        self.points.push(point);
    }

    /// True when the boundary has enough vertices to constrain an analysis
    pub fn is_enforceable(&self) -> bool {
        self.points.len() >= MIN_ENFORCEABLE_VERTICES
    }

    /// Arithmetic-mean centroid, `None` for an empty boundary
    pub fn centroid(&self) -> Option<Coordinate> {
        spatial::centroid(&self.points)
    }

    /// Latitude/longitude extent, `None` for an empty boundary
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let first = self.points.first()?;
        let init = BoundingBox {
            min_lat: first.lat(),
            min_lng: first.lng(),
            max_lat: first.lat(),
            max_lng: first.lng(),
        };

        Some(self.points.iter().fold(init, |bbox, p| BoundingBox {
            min_lat: bbox.min_lat.min(p.lat()),
            min_lng: bbox.min_lng.min(p.lng()),
            max_lat: bbox.max_lat.max(p.lat()),
            max_lng: bbox.max_lng.max(p.lng()),
        }))
    }

    /// Closed exterior ring in `[lng, lat]` order
    pub fn closed_ring(&self) -> Vec<[f64; 2]> {
        let mut ring: Vec<[f64; 2]> = self.points.iter().map(Coordinate::to_xy).collect();
        if let (Some(first), Some(last)) = (ring.first().copied(), ring.last().copied()) {
            if first != last {
                ring.push(first);
            }
        }
        ring
    }

    /// Convert to a `geo` polygon for spatial algorithms
    pub fn to_geo_polygon(&self) -> geo::Polygon<f64> {
        let coords: Vec<geo::Coord<f64>> =
            self.closed_ring().into_iter().map(|[x, y]| geo::Coord { x, y }).collect();
        geo::Polygon::new(geo::LineString::new(coords), vec![])
    }

    /// GeoJSON Polygon feature for the map layer
    pub fn to_geojson(&self) -> geojson::Feature {
        let ring: Vec<Vec<f64>> = self.closed_ring().into_iter().map(|c| c.to_vec()).collect();
        let mut properties = serde_json::Map::new();
        properties.insert("vertices".to_string(), serde_json::Value::from(self.len()));

        geojson::Feature {
            bbox: None,
            geometry: Some(geojson::Geometry::new(geojson::Value::Polygon(vec![ring]))),
            id: None,
            properties: Some(properties),
            foreign_members: None,
        }
    }
}

impl From<Vec<Coordinate>> for Boundary {
    fn from(points: Vec<Coordinate>) -> Self {
        Self::new(points)
    }
}

impl FromIterator<Coordinate> for Boundary {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lng: f64) -> Coordinate {
        Coordinate::new(lat, lng).unwrap()
    }

    fn triangle() -> Boundary {
        Boundary::new(vec![c(1.0, 1.0), c(1.0, 2.0), c(2.0, 1.5)])
    }

    #[test]
    fn test_enforceable_needs_three_vertices() {
        let mut boundary = Boundary::default();
        assert!(!boundary.is_enforceable());
        boundary.push(c(0.0, 0.0));
        boundary.push(c(0.0, 1.0));
        assert!(!boundary.is_enforceable());
        boundary.push(c(1.0, 1.0));
        assert!(boundary.is_enforceable());
    }

    #[test]
    fn test_centroid_of_triangle() {
        let centroid = triangle().centroid().unwrap();
        assert!((centroid.lat() - 4.0 / 3.0).abs() < 1e-12);
        assert!((centroid.lng() - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_boundary_has_no_centroid() {
        assert!(Boundary::default().centroid().is_none());
        assert!(Boundary::default().bounding_box().is_none());
    }

    #[test]
    fn test_bounding_box() {
        let bbox = triangle().bounding_box().unwrap();
        assert_eq!(bbox.min_lat, 1.0);
        assert_eq!(bbox.max_lat, 2.0);
        assert_eq!(bbox.min_lng, 1.0);
        assert_eq!(bbox.max_lng, 2.0);
        assert!(bbox.contains(&c(1.5, 1.5)));
        assert!(!bbox.contains(&c(2.5, 1.5)));
    }

    #[test]
    fn test_closed_ring_appends_first_vertex() {
        let ring = triangle().closed_ring();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.first(), ring.last());
        assert_eq!(ring[0], [1.0, 1.0]);
    }

    #[test]
    fn test_geojson_feature() {
        let feature = triangle().to_geojson();
        let json = serde_json::to_value(&feature).unwrap();
        assert_eq!(json["geometry"]["type"], "Polygon");
        assert_eq!(json["geometry"]["coordinates"][0].as_array().unwrap().len(), 4);
        assert_eq!(json["properties"]["vertices"], 3);
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let json = serde_json::to_string(&triangle()).unwrap();
        assert!(json.starts_with("[{"));
        let parsed: Boundary = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, triangle());
    }
}
