use geoprospect_core::formats::{BoundaryImport, ColumnMapping};
use geoprospect_core::models::{ChartPoint, Coordinate, NearbyPlace};
use serde::Serialize;
use tabled::Tabled;

/// Output for import command
#[derive(Debug, Serialize)]
pub struct ImportOutput {
    pub file: String,
    pub vertices: usize,
    pub skipped_rows: usize,
    pub enforceable: bool,
    pub mapping: ColumnMapping,
    pub issues: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Coordinate>,
}

impl ImportOutput {
    pub fn new(file: String, import: &BoundaryImport, centroid: Option<Coordinate>, issues: Vec<String>) -> Self {
        Self {
            file,
            vertices: import.coordinates.len(),
            skipped_rows: import.skipped_rows,
            enforceable: import.coordinates.len() >= 3,
            mapping: import.mapping.clone(),
            issues,
            centroid,
        }
    }
}

/// Table row for one boundary vertex
#[derive(Debug, Serialize, Tabled)]
pub struct VertexRow {
    #[tabled(rename = "#")]
    pub index: usize,
    #[tabled(rename = "Latitude")]
    pub lat: String,
    #[tabled(rename = "Longitude")]
    pub lng: String,
}

impl VertexRow {
    pub fn rows(coordinates: &[Coordinate]) -> Vec<Self> {
        coordinates
            .iter()
            .enumerate()
            .map(|(i, c)| VertexRow {
                index: i + 1,
                lat: format!("{:.5}", c.lat()),
                lng: format!("{:.5}", c.lng()),
            })
            .collect()
    }
}

/// Table row for one chart sample
#[derive(Debug, Serialize, Tabled)]
pub struct ChartRow {
    #[tabled(rename = "Depth (m)")]
    pub depth: String,
    #[tabled(rename = "Resistivity (ohm-m)")]
    pub resistivity: String,
    #[tabled(rename = "Mag. susceptibility (SI)")]
    pub magnetic_susceptibility: String,
}

impl From<&ChartPoint> for ChartRow {
    fn from(point: &ChartPoint) -> Self {
        Self {
            depth: format!("{:.1}", point.depth),
            resistivity: format!("{:.2}", point.resistivity),
            magnetic_susceptibility: format!("{:.5}", point.magnetic_susceptibility),
        }
    }
}

/// Table row for one nearby site
#[derive(Debug, Serialize, Tabled)]
pub struct NearbyRow {
    #[tabled(rename = "Site")]
    pub title: String,
    #[tabled(rename = "Source")]
    pub uri: String,
}

impl From<&NearbyPlace> for NearbyRow {
    fn from(place: &NearbyPlace) -> Self {
        Self { title: place.title.clone(), uri: place.uri.clone().unwrap_or_else(|| "-".to_string()) }
    }
}

/// Table row for one configuration entry
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_rows_are_one_based() {
        let rows = VertexRow::rows(&[Coordinate::new(1.5, -2.25).unwrap()]);
        assert_eq!(rows[0].index, 1);
        assert_eq!(rows[0].lat, "1.50000");
        assert_eq!(rows[0].lng, "-2.25000");
    }

    #[test]
    fn test_nearby_row_without_uri() {
        let row = NearbyRow::from(&NearbyPlace::new("Grasberg", None));
        assert_eq!(row.uri, "-");
    }
}
