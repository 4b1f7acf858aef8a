//! Orthographic strategy with a 90 degree clip angle: only the hemisphere
//! facing the viewer is drawn.

use foundation::math::{GeoPoint, Vec2};

use crate::affine::ScreenFrame;
use crate::geometry::open_ring;
use crate::kind::ProjectionKind;
use crate::options::ProjectionParams;
use crate::path::SubPath;
use crate::projector::BaseProjection;
use crate::resample::{bisect_boundary, resample_line, resample_ring};
use crate::rotation::Rotation;

pub fn strategy(params: &ProjectionParams, rotation: Rotation) -> Box<dyn BaseProjection> {
    Box::new(OrthographicProjection::new(params, rotation))
}

#[derive(Debug, Clone)]
pub struct OrthographicProjection {
    frame: ScreenFrame,
    rotation: Rotation,
}

impl OrthographicProjection {
    pub fn new(params: &ProjectionParams, rotation: Rotation) -> Self {
        // The center offset is taken before rotation.
        let c = Rotation::IDENTITY.rotated_vector(GeoPoint::new(params.center[0], params.center[1]));
        Self {
            frame: ScreenFrame::new(params.scale, params.translate, Vec2::new(c.y, c.z)),
            rotation,
        }
    }

    pub fn is_visible(&self, p: GeoPoint) -> bool {
        self.rotation.rotated_vector(p).x > 0.0
    }

    fn raw(&self, p: GeoPoint) -> Vec2 {
        let v = self.rotation.rotated_vector(p);
        Vec2::new(v.y, v.z)
    }

    /// Raw point snapped onto the horizon circle.
    fn horizon_raw(&self, p: GeoPoint) -> Vec2 {
        let r = self.raw(p);
        let len = r.length();
        if len <= f64::EPSILON { r } else { r * (1.0 / len) }
    }

    /// Screen center and radius of the horizon circle.
    pub fn horizon(&self) -> (Vec2, f64) {
        (Vec2::new(self.frame.dx, self.frame.dy), self.frame.k)
    }

    fn crossing(&self, visible: GeoPoint, hidden: GeoPoint) -> GeoPoint {
        bisect_boundary(visible, hidden, |g| self.is_visible(g))
    }

    /// Visible runs of `points`, each bounded by horizon crossings where the
    /// run was cut.
    fn visible_runs(&self, points: &[GeoPoint]) -> Vec<Vec<Vec2>> {
        let mut runs = Vec::new();
        let mut current: Vec<Vec2> = Vec::new();
        let mut prev: Option<(GeoPoint, bool)> = None;
        for &p in points {
            let vis = self.is_visible(p);
            match (prev, vis) {
                (None, true) | (Some((_, true)), true) => current.push(self.raw(p)),
                (None, false) | (Some((_, false)), false) => {}
                (Some((a, false)), true) => {
                    current.push(self.horizon_raw(self.crossing(p, a)));
                    current.push(self.raw(p));
                }
                (Some((a, true)), false) => {
                    current.push(self.horizon_raw(self.crossing(a, p)));
                    runs.push(std::mem::take(&mut current));
                }
            }
            prev = Some((p, vis));
        }
        if !current.is_empty() {
            runs.push(current);
        }
        runs
    }

    /// Horizon arc from `from` to `to` (both on the unit circle), excluding
    /// the endpoints, taking the shorter way round.
    fn horizon_arc(from: Vec2, to: Vec2, step_deg: f64) -> Vec<Vec2> {
        let a0 = from.y.atan2(from.x);
        let a1 = to.y.atan2(to.x);
        let mut delta = a1 - a0;
        while delta > std::f64::consts::PI {
            delta -= std::f64::consts::TAU;
        }
        while delta < -std::f64::consts::PI {
            delta += std::f64::consts::TAU;
        }
        let steps = ((delta.abs() / step_deg.to_radians()).ceil() as usize).max(1);
        (1..steps)
            .map(|i| Vec2::from_angle(a0 + delta * i as f64 / steps as f64))
            .collect()
    }
}

impl BaseProjection for OrthographicProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Globe
    }

    fn project(&self, p: GeoPoint) -> (Vec2, bool) {
        (self.frame.to_screen(self.raw(p)), self.is_visible(p))
    }

    fn line(&self, points: &[GeoPoint], step_deg: f64) -> Vec<SubPath> {
        self.visible_runs(&resample_line(points, step_deg))
            .into_iter()
            .filter(|run| run.len() >= 2)
            .map(|run| SubPath::open(run.into_iter().map(|r| self.frame.to_screen(r)).collect()))
            .collect()
    }

    fn ring(&self, ring: &[GeoPoint], step_deg: f64) -> Vec<SubPath> {
        let ring = resample_ring(open_ring(ring), step_deg);
        if ring.len() < 3 {
            return Vec::new();
        }
        let Some(hidden) = ring.iter().position(|&p| !self.is_visible(p)) else {
            let pts = ring.iter().map(|&p| self.frame.to_screen(self.raw(p))).collect();
            return vec![SubPath::closed(pts)];
        };

        // Start right after a hidden vertex so every visible run is complete.
        let n = ring.len();
        let rotated: Vec<GeoPoint> = (0..=n).map(|k| ring[(hidden + k) % n]).collect();
        self.visible_runs(&rotated)
            .into_iter()
            .filter(|run| run.len() >= 2)
            .map(|mut run| {
                if let (Some(&enter), Some(&exit)) = (run.first(), run.last()) {
                    run.extend(Self::horizon_arc(exit, enter, step_deg));
                }
                SubPath::closed(run.into_iter().map(|r| self.frame.to_screen(r)).collect())
            })
            .collect()
    }
}
