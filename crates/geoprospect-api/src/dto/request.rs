use geoprospect_core::models::Coordinate;
use serde::Deserialize;

/// Boundary replacement body; coordinates are validated on deserialization
#[derive(Debug, Deserialize)]
pub struct BoundaryRequest {
    pub coordinates: Vec<Coordinate>,
}

/// CSV upload body
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    pub file_name: String,
    pub content: String,
}
