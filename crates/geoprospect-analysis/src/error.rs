use geoprospect_core::GeoprospectError;
use geoprospect_llm::GatewayError;
use thiserror::Error;

/// Main error type for analysis runs
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("No analysis target: select a point or draw a boundary with at least 3 vertices")]
    NoTarget,

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Chart data could not be used: {reason}")]
    ChartData { reason: String },

    #[error(transparent)]
    Boundary(#[from] GeoprospectError),
}

impl From<geoprospect_core::ImportError> for AnalysisError {
    fn from(err: geoprospect_core::ImportError) -> Self {
        AnalysisError::Boundary(GeoprospectError::Import(err))
    }
}

/// Result type alias for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
