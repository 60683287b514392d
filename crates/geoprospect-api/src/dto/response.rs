use geoprospect_analysis::RunState;
use geoprospect_core::formats::{BoundaryImport, ColumnMapping};
use geoprospect_core::models::{AnalysisStatus, Boundary, Coordinate};
use geoprospect_core::spatial::ValidationResult;
use serde::Serialize;

/// Health check response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self { status: "ok", service: "geoprospect-api" }
    }
}

/// Current selection
#[derive(Debug, Serialize)]
pub struct TargetResponse {
    pub point: Option<Coordinate>,
}

/// Boundary state after a change
#[derive(Debug, Serialize)]
pub struct BoundaryResponse {
    pub vertices: usize,
    /// True once the boundary has 3+ vertices and overrides the point
    pub enforceable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub centroid: Option<Coordinate>,
    /// Lenient-mode validation warnings
    pub issues: Vec<String>,
    /// GeoJSON polygon for the map overlay, once enforceable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<geojson::Feature>,
}

impl BoundaryResponse {
    pub fn new(boundary: &Boundary, validation: Option<&ValidationResult>) -> Self {
        let issues = validation
            .map(|v| v.issues.iter().map(|i| format!("{}: {}", i.location, i.reason)).collect())
            .unwrap_or_default();
        Self {
            vertices: boundary.len(),
            enforceable: boundary.is_enforceable(),
            centroid: boundary.centroid(),
            issues,
            geojson: boundary.is_enforceable().then(|| boundary.to_geojson()),
        }
    }
}

/// Boundary import result
#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub mapping: ColumnMapping,
    pub skipped_rows: usize,
    pub boundary: BoundaryResponse,
}

impl ImportResponse {
    pub fn new(import: &BoundaryImport, boundary: BoundaryResponse) -> Self {
        Self { mapping: import.mapping.clone(), skipped_rows: import.skipped_rows, boundary }
    }
}

/// Run accepted (202)
#[derive(Debug, Serialize)]
pub struct AnalysisStartedResponse {
    pub run_id: u64,
    pub status: AnalysisStatus,
}

/// Run snapshot with the polling hint front ends need
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    pub running: bool,
    #[serde(flatten)]
    pub run: RunState,
}

impl From<RunState> for AnalysisResponse {
    fn from(run: RunState) -> Self {
        Self { running: run.status.is_running(), run }
    }
}
