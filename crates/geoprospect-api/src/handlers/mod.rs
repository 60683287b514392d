mod analysis;
mod boundary;
mod health;
mod target;

pub use analysis::{get_analysis, get_chart_csv, start_analysis};
pub use boundary::{add_boundary_vertex, clear_boundary, import_boundary, replace_boundary};
pub use health::health_check;
pub use target::{clear_target, get_target, set_target};
