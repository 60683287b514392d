use std::fmt;

use serde::{Deserialize, Serialize};

/// User-visible progress of one analysis run.
///
/// `Idle` is initial, `Complete` and `Error` are terminal. A new run resets
/// to `Uploading`, and within a run the status only moves forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AnalysisStatus {
    #[default]
    Idle,
    Uploading,
    FetchingSatellite,
    ProcessingGeophysics,
    ScrapingData,
    AnalyzingAi,
    Complete,
    Error,
}

impl AnalysisStatus {
    /// Time-paced stages entered after `Uploading`, in order
    pub const TIMED_STAGES: [AnalysisStatus; 4] = [
        AnalysisStatus::FetchingSatellite,
        AnalysisStatus::ProcessingGeophysics,
        AnalysisStatus::ScrapingData,
        AnalysisStatus::AnalyzingAi,
    ];

    fn rank(self) -> u8 {
        match self {
            AnalysisStatus::Idle => 0,
            AnalysisStatus::Uploading => 1,
            AnalysisStatus::FetchingSatellite => 2,
            AnalysisStatus::ProcessingGeophysics => 3,
            AnalysisStatus::ScrapingData => 4,
            AnalysisStatus::AnalyzingAi => 5,
            AnalysisStatus::Complete | AnalysisStatus::Error => 6,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, AnalysisStatus::Complete | AnalysisStatus::Error)
    }

    /// True while a run is in flight
    pub fn is_running(self) -> bool {
        !self.is_terminal() && self != AnalysisStatus::Idle
    }

    /// Whether `next` is a forward move within the same run
    pub fn can_advance_to(self, next: AnalysisStatus) -> bool {
        !self.is_terminal() && next.rank() > self.rank()
    }

    /// Progress message shown to the operator
    pub fn label(self) -> &'static str {
        match self {
            AnalysisStatus::Idle => "Ready",
            AnalysisStatus::Uploading => "Uploading target parameters...",
            AnalysisStatus::FetchingSatellite => "Fetching satellite imagery...",
            AnalysisStatus::ProcessingGeophysics => "Processing geophysical layers...",
            AnalysisStatus::ScrapingData => "Gathering public exploration records...",
            AnalysisStatus::AnalyzingAi => "Synthesizing exploration report...",
            AnalysisStatus::Complete => "Analysis complete",
            AnalysisStatus::Error => "Analysis failed",
        }
    }
}

impl fmt::Display for AnalysisStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnalysisStatus::Idle => "IDLE",
            AnalysisStatus::Uploading => "UPLOADING",
            AnalysisStatus::FetchingSatellite => "FETCHING_SATELLITE",
            AnalysisStatus::ProcessingGeophysics => "PROCESSING_GEOPHYSICS",
            AnalysisStatus::ScrapingData => "SCRAPING_DATA",
            AnalysisStatus::AnalyzingAi => "ANALYZING_AI",
            AnalysisStatus::Complete => "COMPLETE",
            AnalysisStatus::Error => "ERROR",
        };
        f.write_str(name)
    }
}
