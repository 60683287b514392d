use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use geoprospect_core::models::{Boundary, Coordinate};

use crate::dto::{BoundaryRequest, BoundaryResponse, ImportRequest, ImportResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// Append one drawn vertex
pub async fn add_boundary_vertex(
    State(state): State<Arc<AppState>>,
    Json(vertex): Json<Coordinate>,
) -> Result<Json<BoundaryResponse>, ApiError> {
    state.session.add_boundary_vertex(vertex).await?;
    let boundary = state.session.boundary().await;
    Ok(Json(BoundaryResponse::new(&boundary, None)))
}

pub async fn replace_boundary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<BoundaryRequest>,
) -> Result<Json<BoundaryResponse>, ApiError> {
    tracing::info!(vertices = request.coordinates.len(), "Replacing boundary");

    let boundary = Boundary::new(request.coordinates);
    let validation = state.session.replace_boundary(boundary.clone()).await.map_err(|e| {
        tracing::warn!(error = %e, "Boundary rejected");
        ApiError::from(e)
    })?;

    Ok(Json(BoundaryResponse::new(&boundary, Some(&validation))))
}

pub async fn clear_boundary(State(state): State<Arc<AppState>>) -> StatusCode {
    state.session.clear_boundary().await;
    StatusCode::NO_CONTENT
}

/// Import a CSV upload; the boundary is only replaced when the whole import succeeds
pub async fn import_boundary(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ImportResponse>, ApiError> {
    tracing::info!(file = %request.file_name, size = request.content.len(), "Received boundary upload");

    let import = state
        .session
        .import_boundary_csv(&request.file_name, &request.content)
        .await
        .map_err(|e| {
            tracing::warn!(file = %request.file_name, error = %e, "Boundary import failed");
            ApiError::from(e)
        })?;

    let boundary = state.session.boundary().await;
    Ok(Json(ImportResponse::new(&import, BoundaryResponse::new(&boundary, None))))
}
