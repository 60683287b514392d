//! Text formats exchanged with operators: boundary CSV import and chart CSV export.

pub mod boundary_csv;
pub mod chart_csv;

pub use boundary_csv::{
    check_upload, import_boundary, BoundaryImport, ColumnMapping, Delimiter, HeaderDetection,
    DEFAULT_MAX_IMPORT_BYTES,
};
pub use chart_csv::{chart_to_csv, CHART_CSV_HEADER};
