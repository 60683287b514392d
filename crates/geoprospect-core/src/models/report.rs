use serde::{Deserialize, Serialize};

use super::{Boundary, Coordinate};

/// Exploration report assembled for one analysis run.
///
/// `sources` never holds duplicates and keeps first-seen order. `raw_markdown`
/// is non-empty for every report the pipeline produces.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub title: String,
    pub location: String,
    pub geological_summary: String,
    pub mineral_potential: Vec<String>,
    pub nearby_projects: Vec<String>,
    pub recommendations: String,
    pub risk_assessment: String,
    pub sources: Vec<String>,
    pub raw_markdown: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_minerals: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boundary: Option<Boundary>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub center: Option<Coordinate>,

    /// Reference to a captured map image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_snapshot: Option<String>,
}

/// Known exploration site near the target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NearbyPlace {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
}

impl NearbyPlace {
    pub fn new(title: impl Into<String>, uri: Option<String>) -> Self {
        Self { title: title.into(), uri }
    }
}
