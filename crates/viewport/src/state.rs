use foundation::math::Vec2;
use projection::{Affine, ProjectionKind, Rotation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewportState {
    pub kind: ProjectionKind,
    pub scale: f64,
    /// Screen-space offset in pixels.
    pub translate: Vec2,
    /// Always identity unless `kind` is the globe.
    pub rotation: Rotation,
}

impl ViewportState {
    pub fn new(kind: ProjectionKind) -> Self {
        Self {
            kind,
            scale: 1.0,
            translate: Vec2::ZERO,
            rotation: Rotation::IDENTITY,
        }
    }

    pub fn affine(&self) -> Affine {
        Affine::new(self.scale, self.translate)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub width: f64,
    pub height: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub initial_projection: ProjectionKind,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: 960.0,
            height: 600.0,
            min_scale: 0.25,
            max_scale: 32.0,
            initial_projection: ProjectionKind::Flat,
        }
    }
}

impl ViewportConfig {
    /// Scale bounds, repaired so that `0 < min <= max`.
    pub fn scale_bounds(&self) -> (f64, f64) {
        let min = if self.min_scale.is_finite() && self.min_scale > 0.0 {
            self.min_scale
        } else {
            0.25
        };
        let max = if self.max_scale.is_finite() && self.max_scale >= min {
            self.max_scale
        } else {
            min.max(32.0)
        };
        (min, max)
    }
}
