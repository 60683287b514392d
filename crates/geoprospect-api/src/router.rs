use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::state::AppState;

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health
        .route("/health", get(handlers::health_check))

        // Selection
        .route(
            "/api/v1/target",
            get(handlers::get_target).put(handlers::set_target).delete(handlers::clear_target),
        )
        .route(
            "/api/v1/boundary",
            put(handlers::replace_boundary).delete(handlers::clear_boundary),
        )
        .route("/api/v1/boundary/vertices", post(handlers::add_boundary_vertex))
        .route("/api/v1/boundary/import", post(handlers::import_boundary))

        // Analysis runs
        .route(
            "/api/v1/analysis",
            get(handlers::get_analysis).post(handlers::start_analysis),
        )
        .route("/api/v1/analysis/chart.csv", get(handlers::get_chart_csv))

        .with_state(state)
}
