use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use geoprospect_core::models::Coordinate;

use crate::dto::TargetResponse;
use crate::state::AppState;

pub async fn get_target(State(state): State<Arc<AppState>>) -> Json<TargetResponse> {
    Json(TargetResponse { point: state.session.selected_point().await })
}

pub async fn set_target(
    State(state): State<Arc<AppState>>,
    Json(point): Json<Coordinate>,
) -> Json<TargetResponse> {
    tracing::info!(point = %point.format_for_prompt(), "Selecting point");
    state.session.select_point(point).await;
    Json(TargetResponse { point: Some(point) })
}

pub async fn clear_target(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.clear_point().await;
    StatusCode::NO_CONTENT
}
