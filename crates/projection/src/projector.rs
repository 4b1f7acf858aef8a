use foundation::math::{GeoPoint, Vec2, canonical_f64};

use crate::affine::Affine;
use crate::geometry::Geometry;
use crate::kind::{ProjectionError, ProjectionKind};
use crate::options::{ProjectionOptions, ProjectionParams};
use crate::path::{PathDescriptor, SubPath};
use crate::rotation::Rotation;
use crate::{flat, globe};

/// Final on-screen position in pixels.
pub type ScreenPoint = Vec2;

/// A base projection strategy: geographic degrees to base screen pixels,
/// before the zoom/pan affine is applied.
pub trait BaseProjection: std::fmt::Debug {
    fn kind(&self) -> ProjectionKind;

    /// Base screen position and whether the point survives clipping.
    fn project(&self, p: GeoPoint) -> (Vec2, bool);

    /// Clipped, resampled polyline pieces.
    fn line(&self, points: &[GeoPoint], step_deg: f64) -> Vec<SubPath>;

    /// Clipped, resampled closed pieces of one polygon ring.
    fn ring(&self, ring: &[GeoPoint], step_deg: f64) -> Vec<SubPath>;
}

type StrategyFn = fn(&ProjectionParams, Rotation) -> Box<dyn BaseProjection>;

/// Indexed by `ProjectionKind as usize`.
const STRATEGIES: [StrategyFn; 2] = [flat::strategy, globe::strategy];

fn build_base(kind: ProjectionKind, options: &ProjectionOptions, rotation: Rotation) -> Box<dyn BaseProjection> {
    STRATEGIES[kind as usize](options.params(kind), rotation)
}

/// Identity of a base projection. Geometry projected under equal
/// signatures differs only by the affine transform.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct BaseSignature {
    kind: ProjectionKind,
    rotation: [u64; 2],
    params: [u64; 5],
    step: u64,
}

fn bits(v: f64) -> u64 {
    canonical_f64(v).to_bits()
}

/// Pure geographic to screen transform.
///
/// Ordering contract: `path_for(g)` is `base_path_for(g)` with `affine()`
/// applied point by point, so cached base paths stay valid across zoom and
/// pan as long as `base_signature()` is unchanged.
#[derive(Debug)]
pub struct GeoProjector {
    kind: ProjectionKind,
    rotation: Rotation,
    affine: Affine,
    options: ProjectionOptions,
    base: Box<dyn BaseProjection>,
}

impl Clone for GeoProjector {
    fn clone(&self) -> Self {
        GeoProjector::new(self.kind, self.rotation, self.affine, self.options.clone())
    }
}

impl Default for GeoProjector {
    fn default() -> Self {
        GeoProjector::new(
            ProjectionKind::Flat,
            Rotation::IDENTITY,
            Affine::IDENTITY,
            ProjectionOptions::default(),
        )
    }
}

impl GeoProjector {
    /// Rotation is only honored by rotatable kinds; flat projectors always
    /// carry the identity rotation.
    pub fn new(kind: ProjectionKind, rotation: Rotation, affine: Affine, options: ProjectionOptions) -> Self {
        let rotation = if kind.is_rotatable() && rotation.is_finite() {
            rotation
        } else {
            Rotation::IDENTITY
        };
        let base = build_base(kind, &options, rotation);
        Self {
            kind,
            rotation,
            affine,
            options,
            base,
        }
    }

    pub fn from_name(
        name: &str,
        rotation: Rotation,
        affine: Affine,
        options: ProjectionOptions,
    ) -> Result<Self, ProjectionError> {
        let kind: ProjectionKind = name.parse()?;
        Ok(Self::new(kind, rotation, affine, options))
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn affine(&self) -> Affine {
        self.affine
    }

    pub fn options(&self) -> &ProjectionOptions {
        &self.options
    }

    /// Same base projection, different zoom/pan.
    pub fn with_affine(&self, affine: Affine) -> Self {
        GeoProjector::new(self.kind, self.rotation, affine, self.options.clone())
    }

    pub fn base_signature(&self) -> BaseSignature {
        let p = self.options.params(self.kind);
        BaseSignature {
            kind: self.kind,
            rotation: [bits(self.rotation.lambda), bits(self.rotation.phi)],
            params: [
                bits(p.scale),
                bits(p.center[0]),
                bits(p.center[1]),
                bits(p.translate[0]),
                bits(p.translate[1]),
            ],
            step: bits(self.options.step_deg()),
        }
    }

    pub fn project(&self, p: GeoPoint) -> ScreenPoint {
        self.affine.apply(self.base.project(p).0)
    }

    /// `None` when the point is clipped (back hemisphere of the globe).
    pub fn project_visible(&self, p: GeoPoint) -> Option<ScreenPoint> {
        let (base, visible) = self.base.project(p);
        visible.then(|| self.affine.apply(base))
    }

    pub fn is_visible(&self, p: GeoPoint) -> bool {
        self.base.project(p).1
    }

    /// Path in base screen space (affine not applied).
    pub fn base_path_for(&self, geometry: &Geometry) -> PathDescriptor {
        let step = self.options.step_deg();
        let mut subpaths = Vec::new();
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::LineString(line) => subpaths.extend(self.base.line(line, step)),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    subpaths.extend(self.base.line(line, step));
                }
            }
            Geometry::Polygon(rings) => {
                for ring in rings {
                    subpaths.extend(self.base.ring(ring, step));
                }
            }
            Geometry::MultiPolygon(polys) => {
                for ring in polys.iter().flatten() {
                    subpaths.extend(self.base.ring(ring, step));
                }
            }
        }
        PathDescriptor::new(subpaths)
    }

    pub fn path_for(&self, geometry: &Geometry) -> PathDescriptor {
        self.base_path_for(geometry).transformed(&self.affine)
    }
}
