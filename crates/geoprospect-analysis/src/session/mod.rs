//! In-memory analysis session: the current selection and the current run.

mod run;

pub use run::{RunHandle, RunOutcome, RunState, StatusUpdate};

use std::sync::Arc;
use std::time::Duration;

use geoprospect_core::config::LayeredConfig;
use geoprospect_core::formats::{check_upload, import_boundary, BoundaryImport};
use geoprospect_core::models::{AnalysisStatus, Boundary, Coordinate, Target};
use geoprospect_core::spatial::{validate_boundary, BoundaryLimits, ValidationResult, ValidityMode};
use geoprospect_core::GeoprospectError;
use geoprospect_llm::ModelGateway;
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;

use crate::error::{AnalysisError, Result};

/// Tunables for a session, resolved from configuration
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    /// Samples requested from the chart call
    pub chart_points: usize,
    /// Pause between timed status stages
    pub stage_delay: Duration,
    pub boundary_limits: BoundaryLimits,
    pub validity_mode: ValidityMode,
    pub max_import_bytes: u64,
}

impl SessionSettings {
    pub fn from_config(config: &LayeredConfig) -> Self {
        Self {
            chart_points: config.chart_points.value,
            stage_delay: config.stage_delay(),
            boundary_limits: config.boundary_limits(),
            validity_mode: config.boundary_validity.value,
            max_import_bytes: config.max_import_bytes.value,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&LayeredConfig::with_defaults())
    }
}

/// Parameters of one run trigger
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// Place name shown alongside the coordinates
    #[serde(default)]
    pub location_label: String,

    /// Also run the deep-reasoning pass
    #[serde(default)]
    pub use_deep_reasoning: bool,

    /// Commodity to focus on; blank means none
    #[serde(default)]
    pub mineral_focus: String,

    /// Reference to a captured map image, attached to the report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub map_snapshot: Option<String>,
}

#[derive(Debug, Default)]
struct Selection {
    point: Option<Coordinate>,
    boundary: Boundary,
}

/// Analysis session holding the selection and the current run
///
/// Cloning is cheap; clones share the same state.
pub struct AnalysisSession<G> {
    inner: Arc<Inner<G>>,
}

impl<G> Clone for AnalysisSession<G> {
    fn clone(&self) -> Self {
        Self { inner: Arc::clone(&self.inner) }
    }
}

pub(crate) struct Inner<G> {
    gateway: G,
    settings: SessionSettings,
    selection: RwLock<Selection>,
    run: RwLock<RunState>,
    status_tx: watch::Sender<StatusUpdate>,
    side_tasks: Mutex<Vec<JoinHandle<()>>>,
}

impl<G> AnalysisSession<G>
where
    G: ModelGateway + 'static,
{
    /// Create a new session
    pub fn new(gateway: G, settings: SessionSettings) -> Self {
        let (status_tx, _) = watch::channel(StatusUpdate::default());
        Self {
            inner: Arc::new(Inner {
                gateway,
                settings,
                selection: RwLock::new(Selection::default()),
                run: RwLock::new(RunState::default()),
                status_tx,
                side_tasks: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.inner.settings
    }

    /// Follow status changes of every run
    pub fn subscribe(&self) -> watch::Receiver<StatusUpdate> {
        self.inner.status_tx.subscribe()
    }

    /// Current status and run id
    pub fn status(&self) -> StatusUpdate {
        *self.inner.status_tx.borrow()
    }

    /// Copy of the current run state
    pub async fn snapshot(&self) -> RunState {
        self.inner.run.read().await.clone()
    }

    pub async fn select_point(&self, point: Coordinate) {
        self.inner.selection.write().await.point = Some(point);
    }

    pub async fn clear_point(&self) {
        self.inner.selection.write().await.point = None;
    }

    pub async fn selected_point(&self) -> Option<Coordinate> {
        self.inner.selection.read().await.point
    }

    pub async fn boundary(&self) -> Boundary {
        self.inner.selection.read().await.boundary.clone()
    }

    /// Append a drawn vertex; returns the new vertex count
    pub async fn add_boundary_vertex(&self, vertex: Coordinate) -> Result<usize> {
        let limit = self.inner.settings.boundary_limits.max_vertices;
        let mut selection = self.inner.selection.write().await;
        if selection.boundary.len() >= limit {
            return Err(GeoprospectError::BoundaryTooLarge {
                vertices: selection.boundary.len() + 1,
                limit,
            }
            .into());
        }
        selection.boundary.push(vertex);
        Ok(selection.boundary.len())
    }

    /// Replace the boundary in full, or leave it untouched on error
    pub async fn replace_boundary(&self, boundary: Boundary) -> Result<ValidationResult> {
        let validation = self.validate(&boundary)?;
        self.inner.selection.write().await.boundary = boundary;
        Ok(validation)
    }

    pub async fn clear_boundary(&self) {
        self.inner.selection.write().await.boundary = Boundary::default();
    }

    /// Import an uploaded CSV and replace the boundary with its coordinates.
    ///
    /// Either the whole import is applied or nothing changes.
    pub async fn import_boundary_csv(&self, file_name: &str, content: &str) -> Result<BoundaryImport> {
        check_upload(file_name, content.len() as u64, self.inner.settings.max_import_bytes)?;
        let import = import_boundary(content)?;

        let boundary = Boundary::new(import.coordinates.clone());
        self.replace_boundary(boundary).await?;

        tracing::info!(
            file = file_name,
            vertices = import.coordinates.len(),
            skipped = import.skipped_rows,
            "Imported boundary"
        );
        Ok(import)
    }

    /// Target a run would use right now
    pub async fn target(&self) -> Option<Target> {
        let selection = self.inner.selection.read().await;
        Target::resolve(selection.point, &selection.boundary)
    }

    fn validate(&self, boundary: &Boundary) -> Result<ValidationResult> {
        let settings = &self.inner.settings;
        Ok(validate_boundary(boundary, &settings.boundary_limits, settings.validity_mode)?)
    }

    /// Start a run for the current target.
    ///
    /// Discards the previous run's results, issues the side calls, and drives
    /// the status state machine on a background task. A run still in flight
    /// keeps going, but nothing it produces is committed any more.
    pub async fn start_analysis(&self, request: AnalysisRequest) -> Result<RunHandle> {
        let target = self.target().await.ok_or(AnalysisError::NoTarget)?;
        if let Some(boundary) = target.boundary() {
            self.validate(boundary)?;
        }

        let run_id = {
            let mut run = self.inner.run.write().await;
            let run_id = run.run_id + 1;
            *run = RunState::started(run_id, target.clone());
            self.inner
                .status_tx
                .send_replace(StatusUpdate { run_id, status: AnalysisStatus::Uploading });
            run_id
        };

        tracing::info!(
            run_id,
            target = %target.describe(),
            deep = request.use_deep_reasoning,
            "Starting analysis run"
        );

        let side_calls = self.inner.spawn_side_calls(run_id, &target, &request);
        {
            let mut tasks = self.inner.side_tasks.lock().await;
            tasks.retain(|task| !task.is_finished());
            tasks.extend(side_calls);
        }

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(inner.drive(run_id, target, request));
        Ok(RunHandle::new(run_id, task))
    }

    /// Wait for every outstanding side call to settle
    pub async fn settle_side_calls(&self) {
        let tasks = std::mem::take(&mut *self.inner.side_tasks.lock().await);
        for task in tasks {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Side call task ended abnormally");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_follow_config() {
        let mut config = LayeredConfig::with_defaults();
        config.chart_points.value = 12;
        config.stage_delay_ms.value = 0;

        let settings = SessionSettings::from_config(&config);
        assert_eq!(settings.chart_points, 12);
        assert_eq!(settings.stage_delay, Duration::ZERO);
        assert_eq!(settings.validity_mode, ValidityMode::Lenient);
    }

    #[test]
    fn test_request_defaults() {
        let request: AnalysisRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(request, AnalysisRequest::default());
        assert!(!request.use_deep_reasoning);
    }
}
