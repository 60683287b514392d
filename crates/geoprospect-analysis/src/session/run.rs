//! One analysis run: state, status transitions, and the call fan-out.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use geoprospect_core::models::{AnalysisStatus, ChartPoint, NearbyPlace, Report, Target};
use geoprospect_llm::{CallProfile, ModelGateway};
use serde::Serialize;
use tokio::task::JoinHandle;

use super::{AnalysisRequest, Inner};
use crate::chart::parse_chart;
use crate::error::AnalysisError;
use crate::extract::{extract, ReportContext};
use crate::nearby::extract_nearby_places;
use crate::prompt::PromptBuilder;

/// Status of a specific run, as published on the status channel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StatusUpdate {
    pub run_id: u64,
    pub status: AnalysisStatus,
}

/// Everything the current run has produced so far.
///
/// Replaced wholesale when a new run starts.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunState {
    /// Monotonic run identifier; 0 before the first run
    pub run_id: u64,
    pub status: AnalysisStatus,
    pub target: Option<Target>,
    pub report: Option<Report>,
    /// True when the report text did not match the schema
    pub report_fallback: bool,
    pub chart: Vec<ChartPoint>,
    pub deep_analysis: Option<String>,
    /// `None` while pending, empty when the call failed
    pub quick_summary: Option<String>,
    /// `None` while pending, empty when the call failed
    pub nearby: Option<Vec<NearbyPlace>>,
    /// User-visible failure notice
    pub notice: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl RunState {
    pub(crate) fn started(run_id: u64, target: Target) -> Self {
        Self {
            run_id,
            status: AnalysisStatus::Uploading,
            target: Some(target),
            started_at: Some(Utc::now()),
            ..Default::default()
        }
    }

    /// Wall-clock duration of a finished run in milliseconds
    pub fn elapsed_ms(&self) -> Option<i64> {
        Some((self.finished_at? - self.started_at?).num_milliseconds())
    }
}

/// How a run's background task ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The run reached a terminal status
    Finished(AnalysisStatus),
    /// A newer run started first; nothing further was committed
    Superseded,
}

/// Handle to a run driving in the background
#[derive(Debug)]
pub struct RunHandle {
    run_id: u64,
    task: JoinHandle<RunOutcome>,
}

impl RunHandle {
    pub(crate) fn new(run_id: u64, task: JoinHandle<RunOutcome>) -> Self {
        Self { run_id, task }
    }

    pub fn run_id(&self) -> u64 {
        self.run_id
    }

    /// Wait for the run to end
    pub async fn wait(self) -> RunOutcome {
        match self.task.await {
            Ok(outcome) => outcome,
            Err(e) => {
                tracing::error!(run_id = self.run_id, error = %e, "Run task ended abnormally");
                RunOutcome::Finished(AnalysisStatus::Error)
            }
        }
    }
}

impl<G> Inner<G>
where
    G: ModelGateway + 'static,
{
    /// Apply `update` only if `run_id` is still the current run
    async fn commit(&self, run_id: u64, what: &str, update: impl FnOnce(&mut RunState)) -> bool {
        let mut run = self.run.write().await;
        if run.run_id != run_id {
            tracing::debug!(run_id, current = run.run_id, what, "Discarding stale result");
            return false;
        }
        update(&mut run);
        true
    }

    /// Move the run forward to `next`; returns false if the run is stale
    async fn advance(&self, run_id: u64, next: AnalysisStatus) -> bool {
        let mut run = self.run.write().await;
        if run.run_id != run_id {
            return false;
        }
        if run.status.can_advance_to(next) {
            run.status = next;
            if next.is_terminal() {
                run.finished_at = Some(Utc::now());
            }
            self.status_tx.send_replace(StatusUpdate { run_id, status: next });
            tracing::debug!(run_id, status = %next, "Run status changed");
        }
        true
    }

    /// Issue the quick summary and nearby lookup; failures leave neutral results
    pub(crate) fn spawn_side_calls(
        self: &Arc<Self>,
        run_id: u64,
        target: &Target,
        request: &AnalysisRequest,
    ) -> Vec<JoinHandle<()>> {
        let builder = prompt_builder(target, request);
        let summary_payload = builder.quick_summary();
        let nearby_payload = builder.nearby();

        let inner = Arc::clone(self);
        let summary = tokio::spawn(async move {
            let summary = match inner.gateway.invoke(CallProfile::Fast, &summary_payload).await {
                Ok(output) => output.text.trim().to_string(),
                Err(e) => {
                    tracing::warn!(run_id, error = %e, "Quick summary failed");
                    String::new()
                }
            };
            inner.commit(run_id, "quick summary", |run| run.quick_summary = Some(summary)).await;
        });

        let inner = Arc::clone(self);
        let nearby = tokio::spawn(async move {
            let places = match inner.gateway.invoke(CallProfile::Default, &nearby_payload).await {
                Ok(output) => extract_nearby_places(&output.text),
                Err(e) => {
                    tracing::warn!(run_id, error = %e, "Nearby-site lookup failed");
                    Vec::new()
                }
            };
            inner.commit(run_id, "nearby sites", |run| run.nearby = Some(places)).await;
        });

        vec![summary, nearby]
    }

    /// Drive the status stages, then fan out the required calls and fan in
    pub(crate) async fn drive(
        self: Arc<Self>,
        run_id: u64,
        target: Target,
        request: AnalysisRequest,
    ) -> RunOutcome {
        // Timed stages pace the UI and do not wait on any call
        for stage in AnalysisStatus::TIMED_STAGES {
            tokio::time::sleep(self.settings.stage_delay).await;
            if !self.advance(run_id, stage).await {
                tracing::debug!(run_id, "Run superseded during staging");
                return RunOutcome::Superseded;
            }
        }

        let builder = prompt_builder(&target, &request);
        let report_payload = builder.report();
        let chart_payload = builder.chart(self.settings.chart_points);

        let deep_task = request.use_deep_reasoning.then(|| {
            let inner = Arc::clone(&self);
            let payload = builder.deep();
            tokio::spawn(async move { inner.gateway.invoke(CallProfile::Deep, &payload).await })
        });

        let (report_result, chart_result) = tokio::join!(
            self.gateway.invoke(CallProfile::Default, &report_payload),
            self.gateway.invoke(CallProfile::Structured, &chart_payload),
        );

        let required = report_result.map_err(AnalysisError::from).and_then(|report_output| {
            let chart_output = chart_result?;
            let chart = parse_chart(&chart_output.text, self.settings.chart_points)?;
            Ok((report_output, chart))
        });

        let (report_output, chart) = match required {
            Ok(outputs) => outputs,
            Err(e) => {
                if let Some(task) = deep_task {
                    task.abort();
                }
                return self.fail(run_id, &e).await;
            }
        };

        let context = ReportContext {
            target_description: builder.target_description(),
            target_minerals: builder.mineral_focus().map(str::to_string),
            boundary: target.boundary().cloned(),
            center: Some(target.center()),
            map_snapshot: request.map_snapshot.clone(),
        };
        let extraction = extract(&report_output, &context);
        let report_fallback = extraction.is_fallback();

        let committed = self
            .commit(run_id, "report", |run| {
                run.report = Some(extraction.into_report());
                run.report_fallback = report_fallback;
                run.chart = chart;
            })
            .await;
        if !committed {
            if let Some(task) = deep_task {
                task.abort();
            }
            return RunOutcome::Superseded;
        }

        // Deep pass failures leave the field unset and never fail the run
        let deep_analysis = match deep_task {
            Some(task) => match task.await {
                Ok(Ok(output)) => Some(output.text),
                Ok(Err(e)) => {
                    tracing::warn!(run_id, error = %e, "Deep analysis failed");
                    None
                }
                Err(e) => {
                    tracing::warn!(run_id, error = %e, "Deep analysis task ended abnormally");
                    None
                }
            },
            None => None,
        };

        if !self.commit(run_id, "deep analysis", |run| run.deep_analysis = deep_analysis).await
            || !self.advance(run_id, AnalysisStatus::Complete).await
        {
            return RunOutcome::Superseded;
        }

        tracing::info!(run_id, fallback = report_fallback, "Analysis run complete");
        RunOutcome::Finished(AnalysisStatus::Complete)
    }

    async fn fail(&self, run_id: u64, error: &AnalysisError) -> RunOutcome {
        tracing::error!(run_id, error = %error, "Analysis run failed");
        let mut notice = format!("Analysis failed: {}", error);
        if matches!(error, AnalysisError::Gateway(e) if e.is_quota()) {
            notice.push_str(". The model service quota is exhausted; try again later");
        }
        if !self.commit(run_id, "failure notice", |run| run.notice = Some(notice)).await
            || !self.advance(run_id, AnalysisStatus::Error).await
        {
            return RunOutcome::Superseded;
        }
        RunOutcome::Finished(AnalysisStatus::Error)
    }
}

fn prompt_builder<'a>(target: &'a Target, request: &AnalysisRequest) -> PromptBuilder<'a> {
    PromptBuilder::new(target)
        .with_location_label(&request.location_label)
        .with_mineral_focus(&request.mineral_focus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use geoprospect_core::models::Coordinate;

    #[test]
    fn test_started_state_resets_results() {
        let target = Target::Point { coordinate: Coordinate::new(1.0, 2.0).unwrap() };
        let state = RunState::started(3, target);

        assert_eq!(state.run_id, 3);
        assert_eq!(state.status, AnalysisStatus::Uploading);
        assert!(state.report.is_none());
        assert!(state.chart.is_empty());
        assert!(state.started_at.is_some());
        assert!(state.elapsed_ms().is_none());
    }
}
