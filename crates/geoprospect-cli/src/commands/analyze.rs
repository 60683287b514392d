use crate::cli::AnalyzeArgs;
use crate::commands::import::load_boundary;
use crate::dry_run::{display_planned_calls, PlannedCall};
use crate::errors::{analysis_failed, from_analysis, missing_api_key, no_target};
use crate::interactive::interactive_analyze;
use crate::output::OutputWriter;
use crate::output_types::{ChartRow, NearbyRow};
use crate::progress::{create_spinner, finish_error, finish_success, follow_status, join_follower};
use anyhow::{Context, Result};
use geoprospect_analysis::{
    AnalysisRequest, AnalysisSession, PromptBuilder, RunOutcome, RunState, SessionSettings,
};
use geoprospect_core::config::LayeredConfig;
use geoprospect_core::formats::chart_to_csv;
use geoprospect_core::models::{AnalysisStatus, Boundary, Coordinate, Target};
use geoprospect_llm::GenerativeGateway;
use indicatif::ProgressBar;
use std::fs;

pub async fn execute(
    args: AnalyzeArgs,
    config: &LayeredConfig,
    output: &OutputWriter,
    dry_run: bool,
) -> Result<()> {
    let point = match (args.lat, args.lng) {
        (Some(lat), Some(lng)) => Some(Coordinate::new(lat, lng)?),
        _ => None,
    };

    let boundary = match &args.boundary {
        Some(path) => {
            let (import, validation) = load_boundary(path, config)?;
            for issue in &validation.issues {
                output.warning(format!("Boundary issue at {}: {}", issue.location, issue.reason));
            }
            import.into_boundary()
        }
        None => Boundary::default(),
    };

    let target = Target::resolve(point, &boundary).ok_or_else(no_target)?;

    let mut request = AnalysisRequest {
        location_label: args.label.clone(),
        use_deep_reasoning: args.deep,
        mineral_focus: args.mineral.clone(),
        map_snapshot: args.snapshot.clone(),
    };

    if args.interactive {
        let answers = interactive_analyze(&request.location_label, &request.mineral_focus, request.use_deep_reasoning)?;
        request.location_label = answers.label;
        request.mineral_focus = answers.mineral;
        request.use_deep_reasoning = answers.deep;
    }

    if dry_run {
        let calls: Vec<PlannedCall> = PromptBuilder::new(&target)
            .with_location_label(&request.location_label)
            .with_mineral_focus(&request.mineral_focus)
            .plan(config.chart_points.value, request.use_deep_reasoning)
            .into_iter()
            .map(PlannedCall::from)
            .collect();
        display_planned_calls(output, &calls);
        return Ok(());
    }

    let gateway = GenerativeGateway::from_config(config).map_err(|_| missing_api_key())?;
    let session = AnalysisSession::new(gateway, SessionSettings::from_config(config));

    if let Some(point) = point {
        session.select_point(point).await;
    }
    if !boundary.is_empty() {
        session.replace_boundary(boundary).await.map_err(from_analysis)?;
    }

    if !output.is_json() {
        output.info(format!("Analyzing {}", target.describe()));
    }

    let status_rx = session.subscribe();
    let handle = session.start_analysis(request).await.map_err(from_analysis)?;
    let run_id = handle.run_id();

    let spinner = if output.is_json() { ProgressBar::hidden() } else { create_spinner("Starting") };
    let follower = follow_status(status_rx, run_id, spinner.clone());

    let outcome = handle.wait().await;
    session.settle_side_calls().await;
    join_follower(follower, run_id).await;

    let state = session.snapshot().await;
    tracing::debug!(run_id, status = %state.status, "Run finished");
    match outcome {
        RunOutcome::Finished(AnalysisStatus::Complete) => {
            finish_success(&spinner, &format!("Analysis complete in {}", elapsed(&state)));
        }
        _ => {
            finish_error(&spinner, "Analysis failed");
            let notice = state.notice.as_deref().unwrap_or("The run ended without a result");
            return Err(analysis_failed(notice).into());
        }
    }

    write_exports(&args, &state, output)?;

    if output.is_json() {
        return output.result(&state);
    }
    display_run(&state, output);
    Ok(())
}

fn write_exports(args: &AnalyzeArgs, state: &RunState, output: &OutputWriter) -> Result<()> {
    if let Some(path) = &args.chart_csv {
        fs::write(path, chart_to_csv(&state.chart))
            .with_context(|| format!("Failed to write chart CSV to {}", path.display()))?;
        output.success(format!("Chart data written to {}", path.display()));
    }

    if let (Some(path), Some(report)) = (&args.report_md, &state.report) {
        fs::write(path, &report.raw_markdown)
            .with_context(|| format!("Failed to write report to {}", path.display()))?;
        output.success(format!("Report written to {}", path.display()));
    }
    Ok(())
}

fn display_run(state: &RunState, output: &OutputWriter) {
    if let Some(summary) = state.quick_summary.as_deref().filter(|s| !s.is_empty()) {
        output.section("Quick Summary");
        output.text(summary);
    }

    if let Some(report) = &state.report {
        output.section("Report");
        if state.report_fallback {
            output.warning("The report did not match the expected structure; showing the model text as-is");
        }
        output.text(&report.raw_markdown);
    }

    match state.nearby.as_deref() {
        Some(places) if !places.is_empty() => {
            output.section("Nearby Sites");
            output.table(places.iter().map(NearbyRow::from).collect());
        }
        _ => {}
    }

    output.section("Geophysical Profile");
    output.table(state.chart.iter().map(ChartRow::from).collect());

    if let Some(deep) = &state.deep_analysis {
        output.section("Deep Analysis");
        output.text(deep);
    }

    output.section("Run");
    output.kv("Run id", state.run_id);
    if let Some(started) = state.started_at {
        output.kv("Started", started.to_rfc3339());
    }
    output.kv("Elapsed", elapsed(state));
}

fn elapsed(state: &RunState) -> String {
    match state.elapsed_ms() {
        Some(ms) => format!("{:.1}s", ms as f64 / 1000.0),
        None => "-".to_string(),
    }
}
