use crate::models::ChartPoint;

/// Header row of the chart export
pub const CHART_CSV_HEADER: &str = "depth_m,resistivity_ohmm,magnetic_susceptibility_si";

/// Render chart points as comma-separated rows under [`CHART_CSV_HEADER`]. No quoting.
pub fn chart_to_csv(points: &[ChartPoint]) -> String {
    let mut out = String::with_capacity(CHART_CSV_HEADER.len() + 1 + points.len() * 24);
    out.push_str(CHART_CSV_HEADER);
    out.push('\n');
    for p in points {
        out.push_str(&format!("{},{},{}\n", p.depth, p.resistivity, p.magnetic_susceptibility));
    }
    out
}
