//! GeoProspect Analysis - Prompt building, response extraction, and run orchestration
//!
//! This crate turns a resolved target into model calls, turns model text back
//! into reports, charts and nearby sites, and sequences one analysis run at a
//! time through the status state machine.

pub mod chart;
pub mod error;
pub mod extract;
pub mod nearby;
pub mod prompt;
pub mod session;

pub use chart::parse_chart;
pub use error::{AnalysisError, Result};
pub use extract::{extract, merge_sources, render_markdown, Extraction, ReportContext};
pub use nearby::extract_nearby_places;
pub use prompt::{CallPlan, FieldKind, OutputSchema, PromptBuilder, SchemaField};
pub use session::{
    AnalysisRequest, AnalysisSession, RunHandle, RunOutcome, RunState, SessionSettings, StatusUpdate,
};
