use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use geoprospect_analysis::AnalysisRequest;
use geoprospect_core::formats::chart_to_csv;
use geoprospect_core::models::AnalysisStatus;

use crate::dto::{AnalysisResponse, AnalysisStartedResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Start a run in the background (202 Accepted)
pub async fn start_analysis(
    State(state): State<Arc<AppState>>,
    Json(request): Json<AnalysisRequest>,
) -> Result<(StatusCode, Json<AnalysisStartedResponse>), ApiError> {
    let handle = state.session.start_analysis(request).await.map_err(|e| {
        tracing::warn!(error = %e, "Analysis not started");
        ApiError::from(e)
    })?;

    // The run keeps driving after the handle is dropped
    let response =
        AnalysisStartedResponse { run_id: handle.run_id(), status: AnalysisStatus::Uploading };
    Ok((StatusCode::ACCEPTED, Json(response)))
}

pub async fn get_analysis(State(state): State<Arc<AppState>>) -> Json<AnalysisResponse> {
    Json(state.session.snapshot().await.into())
}

pub async fn get_chart_csv(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let run = state.session.snapshot().await;
    (
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"geophysics.csv\""),
        ],
        chart_to_csv(&run.chart),
    )
}
