use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use geoprospect_analysis::AnalysisError;
use geoprospect_core::GeoprospectError;
use serde::Serialize;

/// Unified API error type
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
    pub details: Option<String>,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, message: message.into(), details: None }
    }

    pub fn unprocessable(message: impl Into<String>) -> Self {
        Self { status: StatusCode::UNPROCESSABLE_ENTITY, message: message.into(), details: None }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self { status: StatusCode::INTERNAL_SERVER_ERROR, message: message.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody { error: self.message, details: self.details };
        (self.status, Json(body)).into_response()
    }
}

impl From<GeoprospectError> for ApiError {
    fn from(err: GeoprospectError) -> Self {
        match &err {
            GeoprospectError::Import(_) => {
                Self::bad_request("Boundary import failed").with_details(err.to_string())
            }
            GeoprospectError::InvalidCoordinate { .. }
            | GeoprospectError::InvalidBoundary { .. }
            | GeoprospectError::BoundaryTooLarge { .. } => {
                Self::unprocessable("Boundary rejected").with_details(err.to_string())
            }
            _ => Self::internal("Internal error").with_details(err.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::NoTarget => Self::bad_request("No analysis target")
                .with_details("Select a point or a boundary with at least 3 vertices"),
            AnalysisError::Boundary(e) => e.into(),
            other => Self::internal("Analysis error").with_details(other.to_string()),
        }
    }
}
