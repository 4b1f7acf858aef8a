use serde::{Deserialize, Serialize};

use crate::kind::ProjectionKind;

/// Base projection parameters: scale in pixels per radian, center in
/// degrees `[lon, lat]`, translate in pixels.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionParams {
    pub scale: f64,
    pub center: [f64; 2],
    pub translate: [f64; 2],
}

impl ProjectionParams {
    pub fn flat_default() -> Self {
        Self {
            scale: 150.0,
            center: [0.0, 25.0],
            translate: [480.0, 250.0],
        }
    }

    pub fn globe_default() -> Self {
        Self {
            scale: 280.0,
            center: [5.0, 8.0],
            translate: [480.0, 250.0],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionOptions {
    pub flat: ProjectionParams,
    pub globe: ProjectionParams,
    /// Maximum great-circle step between resampled points, in degrees.
    pub resample_step_deg: f64,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            flat: ProjectionParams::flat_default(),
            globe: ProjectionParams::globe_default(),
            resample_step_deg: 2.0,
        }
    }
}

impl ProjectionOptions {
    pub fn params(&self, kind: ProjectionKind) -> &ProjectionParams {
        match kind {
            ProjectionKind::Flat => &self.flat,
            ProjectionKind::Globe => &self.globe,
        }
    }

    pub fn step_deg(&self) -> f64 {
        if self.resample_step_deg.is_finite() && self.resample_step_deg > 0.0 {
            self.resample_step_deg
        } else {
            2.0
        }
    }
}
