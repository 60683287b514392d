//! Error types for GeoProspect

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoprospectError {
    // Geometry errors
    #[error("Invalid coordinate ({lat}, {lng}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    #[error("Invalid boundary: {reason}")]
    InvalidBoundary { reason: String },

    #[error("Boundary has {vertices} vertices, the limit is {limit}")]
    BoundaryTooLarge { vertices: usize, limit: usize },

    // Import errors
    #[error(transparent)]
    Import(#[from] ImportError),

    // Configuration errors
    #[error("Missing required configuration: {key}")]
    ConfigMissing { key: String },

    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures of the CSV boundary import.
///
/// An import either fully produces a coordinate list or fails with one of these;
/// malformed individual rows are skipped, never reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    #[error("The file is empty")]
    EmptyInput,

    #[error("No valid coordinates found. Rows need a latitude in [-90, 90] and a longitude in [-180, 180]")]
    NoValidRows,

    #[error("File is {size} bytes, the limit is {limit} bytes")]
    TooLarge { size: u64, limit: u64 },

    #[error("'{file_name}' is not a .csv file")]
    WrongExtension { file_name: String },
}

pub type Result<T> = std::result::Result<T, GeoprospectError>;
