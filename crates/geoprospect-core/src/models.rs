pub mod boundary;
pub mod chart;
pub mod coordinate;
pub mod report;
pub mod status;
pub mod target;

pub use boundary::{Boundary, BoundingBox};
pub use chart::ChartPoint;
pub use coordinate::Coordinate;
pub use report::{NearbyPlace, Report};
pub use status::AnalysisStatus;
pub use target::Target;
