use foundation::math::Vec2;
use projection::{GeoProjector, ProjectionError, ProjectionKind, ProjectionOptions, Rotation};
use tracing::{debug, info};

use crate::gesture::{Gesture, Repaint};
use crate::state::{ViewportConfig, ViewportState};

/// Owns the viewport state and the projector derived from it.
///
/// Every successful change rebuilds the projector and reports the kind of
/// repaint required. Gestures that do not apply to the current projection
/// are ignored and report `None`.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    options: ProjectionOptions,
    width: f64,
    height: f64,
    state: ViewportState,
    projector: GeoProjector,
}

impl ViewportController {
    pub fn new(config: ViewportConfig, options: ProjectionOptions) -> Self {
        let state = ViewportState::new(config.initial_projection);
        let projector = GeoProjector::new(state.kind, state.rotation, state.affine(), options.clone());
        Self {
            width: config.width,
            height: config.height,
            config,
            options,
            state,
            projector,
        }
    }

    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    pub fn state(&self) -> &ViewportState {
        &self.state
    }

    pub fn projector(&self) -> &GeoProjector {
        &self.projector
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn handle(&mut self, gesture: Gesture) -> Option<Repaint> {
        match gesture {
            Gesture::Zoom { factor, anchor } => self.zoom(factor, anchor),
            Gesture::Drag {
                position,
                delta,
                modifier,
            } => match (self.state.kind.is_rotatable(), modifier) {
                (false, false) => self.pan(delta),
                (true, true) => self.rotate_to(position),
                _ => None,
            },
            Gesture::Resize { width, height } => {
                self.resize(width, height);
                None
            }
        }
    }

    pub fn zoom(&mut self, factor: f64, anchor: Option<Vec2>) -> Option<Repaint> {
        if !factor.is_finite() || factor <= 0.0 {
            return None;
        }
        let (min, max) = self.config.scale_bounds();
        let old = self.state.scale;
        let new = (old * factor).clamp(min, max);
        if new == old {
            return None;
        }
        if let Some(a) = anchor.filter(|a| a.is_finite()) {
            let t = self.state.translate;
            self.state.translate = a - (a - t) * (new / old);
        }
        self.state.scale = new;
        debug!(scale = new, "viewport zoomed");
        Some(self.rebuild(Repaint::Transform))
    }

    /// Moves content by `delta` screen pixels. Flat projection only.
    pub fn pan(&mut self, delta: Vec2) -> Option<Repaint> {
        if self.state.kind.is_rotatable() || !delta.is_finite() || delta == Vec2::ZERO {
            return None;
        }
        self.state.translate = self.state.translate + delta;
        Some(self.rebuild(Repaint::Transform))
    }

    /// Maps an absolute pointer position onto a globe rotation: x across the
    /// width to `[-180, 180]`, y down the height to `[90, -90]`.
    pub fn rotate_to(&mut self, position: Vec2) -> Option<Repaint> {
        if !self.state.kind.is_rotatable() || !position.is_finite() {
            return None;
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return None;
        }
        let x = (position.x / self.width).clamp(0.0, 1.0);
        let y = (position.y / self.height).clamp(0.0, 1.0);
        let rotation = Rotation::new(-180.0 + 360.0 * x, 90.0 - 180.0 * y);
        if rotation == self.state.rotation {
            return None;
        }
        self.state.rotation = rotation;
        debug!(lambda = rotation.lambda, phi = rotation.phi, "globe rotated");
        Some(self.rebuild(Repaint::Reproject))
    }

    /// Updates the rotate mapping domain. Non-positive sizes are ignored.
    pub fn resize(&mut self, width: f64, height: f64) {
        if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
            self.width = width;
            self.height = height;
        }
    }

    /// Replaces the projector. Zoom and pan are kept, rotation is reset.
    pub fn set_projection(&mut self, kind: ProjectionKind) -> Repaint {
        info!(from = %self.state.kind, to = %kind, "projection switched");
        self.state.kind = kind;
        self.state.rotation = Rotation::IDENTITY;
        self.rebuild(Repaint::Reproject)
    }

    /// On error the current projection is kept.
    pub fn set_projection_named(&mut self, name: &str) -> Result<Repaint, ProjectionError> {
        let kind: ProjectionKind = name.parse()?;
        Ok(self.set_projection(kind))
    }

    fn rebuild(&mut self, repaint: Repaint) -> Repaint {
        self.projector = match repaint {
            Repaint::Transform => self.projector.with_affine(self.state.affine()),
            Repaint::Reproject => GeoProjector::new(
                self.state.kind,
                self.state.rotation,
                self.state.affine(),
                self.options.clone(),
            ),
        };
        repaint
    }
}
