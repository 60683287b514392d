//! Turn raw report text from the model into a `Report`.
//!
//! Extraction never fails: text that does not match the report schema is kept
//! verbatim in a fallback report.

use std::fmt::Write;

use geoprospect_core::models::{Boundary, Coordinate, Report};
use geoprospect_llm::{strip_code_fences, GatewayOutput};
use serde::Deserialize;

/// Outcome of extraction, tagged so callers can tell degraded results apart
#[derive(Debug, Clone, PartialEq)]
pub enum Extraction {
    /// The payload matched the report schema
    Parsed(Report),
    /// The payload did not parse; the raw text is preserved in the report
    Fallback(Report),
}

impl Extraction {
    pub fn report(&self) -> &Report {
        match self {
            Extraction::Parsed(report) | Extraction::Fallback(report) => report,
        }
    }

    pub fn into_report(self) -> Report {
        match self {
            Extraction::Parsed(report) | Extraction::Fallback(report) => report,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Extraction::Fallback(_))
    }
}

/// Caller-known facts stitched onto the report
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportContext {
    /// Description of the resolved target, used for fallback title and location
    pub target_description: String,
    pub target_minerals: Option<String>,
    pub boundary: Option<Boundary>,
    pub center: Option<Coordinate>,
    pub map_snapshot: Option<String>,
}

/// Strict report payload; optional fields may be omitted by the model
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportPayload {
    title: String,
    location: String,
    geological_summary: String,
    mineral_potential: Vec<String>,
    nearby_projects: Vec<String>,
    recommendations: String,
    risk_assessment: String,
    #[serde(default)]
    sources: Vec<String>,
    #[serde(default)]
    raw_markdown: String,
}

impl From<ReportPayload> for Report {
    fn from(payload: ReportPayload) -> Self {
        Report {
            title: payload.title,
            location: payload.location,
            geological_summary: payload.geological_summary,
            mineral_potential: payload.mineral_potential,
            nearby_projects: payload.nearby_projects,
            recommendations: payload.recommendations,
            risk_assessment: payload.risk_assessment,
            sources: payload.sources,
            raw_markdown: payload.raw_markdown,
            ..Default::default()
        }
    }
}

/// Build the report for one model response
pub fn extract(output: &GatewayOutput, context: &ReportContext) -> Extraction {
    let raw = output.text.as_str();

    let parsed = serde_json::from_str::<ReportPayload>(strip_code_fences(raw));
    let (mut report, fallback) = match parsed {
        Ok(payload) => (Report::from(payload), false),
        Err(e) => {
            tracing::warn!(error = %e, raw_chars = raw.len(), "Report payload did not parse, keeping raw text");
            (fallback_report(raw, context), true)
        }
    };

    report.sources = merge_sources(&report.sources, &output.provenance);
    report.target_minerals = context.target_minerals.clone();
    report.boundary = context.boundary.clone();
    report.center = context.center;
    report.map_snapshot = context.map_snapshot.clone();

    if report.raw_markdown.trim().is_empty() {
        report.raw_markdown = render_markdown(&report);
    }

    if fallback {
        Extraction::Fallback(report)
    } else {
        Extraction::Parsed(report)
    }
}

fn fallback_report(raw: &str, context: &ReportContext) -> Report {
    let text = if raw.trim().is_empty() {
        format!("The model returned an empty response for {}.", context.target_description)
    } else {
        raw.to_string()
    };

    Report {
        title: format!("Exploration report: {}", context.target_description),
        location: context.target_description.clone(),
        geological_summary: text.clone(),
        raw_markdown: text,
        ..Default::default()
    }
}

/// Union of report sources and gateway provenance.
///
/// Exact-string deduplication in first-seen order, report sources first.
pub fn merge_sources(sources: &[String], provenance: &[String]) -> Vec<String> {
    let mut merged: Vec<String> = Vec::with_capacity(sources.len() + provenance.len());
    for source in sources.iter().chain(provenance) {
        if !merged.contains(source) {
            merged.push(source.clone());
        }
    }
    merged
}

/// Markdown document rendered from the report fields
pub fn render_markdown(report: &Report) -> String {
    let mut md = String::new();
    let _ = writeln!(md, "# {}\n", report.title);
    let _ = writeln!(md, "**Location:** {}\n", report.location);
    if let Some(minerals) = &report.target_minerals {
        let _ = writeln!(md, "**Target minerals:** {}\n", minerals);
    }

    section(&mut md, "Geological Summary", &report.geological_summary);
    list_section(&mut md, "Mineral Potential", &report.mineral_potential);
    list_section(&mut md, "Nearby Projects", &report.nearby_projects);
    section(&mut md, "Recommendations", &report.recommendations);
    section(&mut md, "Risk Assessment", &report.risk_assessment);
    list_section(&mut md, "Sources", &report.sources);

    md.trim_end().to_string()
}

fn section(md: &mut String, heading: &str, body: &str) {
    if !body.trim().is_empty() {
        let _ = writeln!(md, "## {}\n\n{}\n", heading, body.trim());
    }
}

fn list_section(md: &mut String, heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    let _ = writeln!(md, "## {}\n", heading);
    for item in items {
        let _ = writeln!(md, "- {}", item);
    }
    md.push('\n');
}
