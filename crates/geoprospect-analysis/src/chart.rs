//! Parse the structured chart payload into depth-ordered samples.

use geoprospect_core::models::ChartPoint;
use geoprospect_llm::strip_code_fences;

use crate::error::{AnalysisError, Result};

/// Parse chart JSON and normalise it to at most `points` samples.
///
/// Samples with a negative depth or any non-finite value are dropped, the rest are
/// stably sorted by depth and truncated. A payload that is not a JSON array
/// of samples, or holds no usable sample, is an error.
pub fn parse_chart(text: &str, points: usize) -> Result<Vec<ChartPoint>> {
    let samples: Vec<ChartPoint> = serde_json::from_str(strip_code_fences(text))
        .map_err(|e| AnalysisError::ChartData { reason: e.to_string() })?;
    let received = samples.len();

    let mut chart: Vec<ChartPoint> = samples.into_iter().filter(ChartPoint::is_plausible).collect();
    if chart.len() < received {
        tracing::debug!(dropped = received - chart.len(), "Dropped implausible chart samples");
    }

    chart.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    chart.truncate(points);

    if chart.is_empty() {
        return Err(AnalysisError::ChartData { reason: "no usable samples".to_string() });
    }
    if chart.len() < points {
        tracing::warn!(expected = points, received = chart.len(), "Chart has fewer samples than requested");
    }

    Ok(chart)
}
