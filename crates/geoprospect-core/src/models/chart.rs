use serde::{Deserialize, Serialize};

/// One sample of the illustrative geophysical depth profile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    /// Depth below surface in meters
    pub depth: f64,
    /// Apparent resistivity in ohm-meters
    pub resistivity: f64,
    /// Magnetic susceptibility in SI units
    pub magnetic_susceptibility: f64,
}

impl ChartPoint {
    pub fn new(depth: f64, resistivity: f64, magnetic_susceptibility: f64) -> Self {
        Self { depth, resistivity, magnetic_susceptibility }
    }

    /// Depth must be a finite, non-negative number; the other values only finite
    pub fn is_plausible(&self) -> bool {
        self.depth.is_finite()
            && self.depth >= 0.0
            && self.resistivity.is_finite()
            && self.magnetic_susceptibility.is_finite()
    }
}
