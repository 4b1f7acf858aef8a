//! Mercator strategy. Rotation is not supported; lines and rings are cut at
//! the antimeridian.

use std::f64::consts::FRAC_PI_4;

use foundation::math::{GeoPoint, MERCATOR_MAX_LAT_DEG, Vec2};

use crate::affine::ScreenFrame;
use crate::geometry::open_ring;
use crate::kind::ProjectionKind;
use crate::options::ProjectionParams;
use crate::path::SubPath;
use crate::projector::BaseProjection;
use crate::resample::{resample_line, resample_ring};
use crate::rotation::Rotation;

pub fn strategy(params: &ProjectionParams, _rotation: Rotation) -> Box<dyn BaseProjection> {
    Box::new(MercatorProjection::new(params))
}

/// Raw Mercator coordinates in radians, latitude clamped to the Mercator limit.
pub fn mercator_raw(p: GeoPoint) -> Vec2 {
    let lat = p
        .latitude
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    Vec2::new(p.longitude.to_radians(), (FRAC_PI_4 + lat / 2.0).tan().ln())
}

#[derive(Debug, Clone)]
pub struct MercatorProjection {
    frame: ScreenFrame,
}

impl MercatorProjection {
    pub fn new(params: &ProjectionParams) -> Self {
        let center = mercator_raw(GeoPoint::new(params.center[0], params.center[1]));
        Self {
            frame: ScreenFrame::new(params.scale, params.translate, center),
        }
    }

    fn to_screen(&self, p: GeoPoint) -> Vec2 {
        self.frame.to_screen(mercator_raw(p))
    }
}

impl BaseProjection for MercatorProjection {
    fn kind(&self) -> ProjectionKind {
        ProjectionKind::Flat
    }

    fn project(&self, p: GeoPoint) -> (Vec2, bool) {
        (self.to_screen(p), true)
    }

    fn line(&self, points: &[GeoPoint], step_deg: f64) -> Vec<SubPath> {
        split_line(&resample_line(points, step_deg))
            .into_iter()
            .filter(|piece| piece.len() >= 2)
            .map(|piece| SubPath::open(piece.into_iter().map(|p| self.to_screen(p)).collect()))
            .collect()
    }

    fn ring(&self, ring: &[GeoPoint], step_deg: f64) -> Vec<SubPath> {
        let ring = resample_ring(open_ring(ring), step_deg);
        if ring.len() < 3 {
            return Vec::new();
        }
        split_ring(&ring)
            .into_iter()
            .map(|piece| SubPath::closed(piece.into_iter().map(|p| self.to_screen(p)).collect()))
            .collect()
    }
}

fn crosses_antimeridian(a: GeoPoint, b: GeoPoint) -> bool {
    (b.longitude - a.longitude).abs() > 180.0
}

fn edge_longitude(lon: f64) -> f64 {
    if lon >= 0.0 { 180.0 } else { -180.0 }
}

/// Latitude where the short way from `a` to `b` meets the antimeridian.
fn crossing_latitude(a: GeoPoint, b: GeoPoint) -> f64 {
    let b_lon = if a.longitude > b.longitude {
        b.longitude + 360.0
    } else {
        b.longitude - 360.0
    };
    let span = b_lon - a.longitude;
    if span.abs() <= f64::EPSILON {
        return a.latitude;
    }
    let t = (edge_longitude(a.longitude) - a.longitude) / span;
    a.latitude + t * (b.latitude - a.latitude)
}

fn split_line(points: &[GeoPoint]) -> Vec<Vec<GeoPoint>> {
    let mut pieces = Vec::new();
    let mut current: Vec<GeoPoint> = Vec::new();
    for (i, &p) in points.iter().enumerate() {
        if i > 0 {
            let prev = points[i - 1];
            if crosses_antimeridian(prev, p) {
                let lat = crossing_latitude(prev, p);
                current.push(GeoPoint::new(edge_longitude(prev.longitude), lat));
                pieces.push(std::mem::take(&mut current));
                current.push(GeoPoint::new(edge_longitude(p.longitude), lat));
            }
        }
        current.push(p);
    }
    pieces.push(current);
    pieces
}

/// Splits an open ring at the antimeridian. Pieces with an even number of
/// crossings start and end on the same map edge and close along it; an odd
/// number means the ring encircles a pole, so the pieces are joined and
/// closed across that pole.
fn split_ring(ring: &[GeoPoint]) -> Vec<Vec<GeoPoint>> {
    let n = ring.len();
    let crossings: Vec<usize> = (0..n)
        .filter(|&i| crosses_antimeridian(ring[i], ring[(i + 1) % n]))
        .collect();
    let Some(&first) = crossings.first() else {
        return vec![ring.to_vec()];
    };

    let mut arcs: Vec<Vec<GeoPoint>> = Vec::new();
    let entry = ring[(first + 1) % n];
    let mut current = vec![GeoPoint::new(
        edge_longitude(entry.longitude),
        crossing_latitude(ring[first], entry),
    )];
    for k in 1..=n {
        let i = (first + k) % n;
        let p = ring[i];
        let q = ring[(i + 1) % n];
        current.push(p);
        if crosses_antimeridian(p, q) {
            let lat = crossing_latitude(p, q);
            current.push(GeoPoint::new(edge_longitude(p.longitude), lat));
            arcs.push(std::mem::take(&mut current));
            current.push(GeoPoint::new(edge_longitude(q.longitude), lat));
        }
    }

    if crossings.len() % 2 == 0 {
        return arcs;
    }

    let mut joined: Vec<GeoPoint> = arcs.into_iter().flatten().collect();
    let mean_lat = ring.iter().map(|p| p.latitude).sum::<f64>() / n as f64;
    let pole = if mean_lat >= 0.0 { 90.0 } else { -90.0 };
    if let (Some(&start), Some(&end)) = (joined.first(), joined.last()) {
        joined.push(GeoPoint::new(end.longitude, pole));
        joined.push(GeoPoint::new(start.longitude, pole));
    }
    vec![joined]
}

#[cfg(test)]
mod tests {
    use super::{MercatorProjection, mercator_raw, split_line, split_ring};
    use crate::options::ProjectionParams;
    use crate::projector::BaseProjection;
    use foundation::math::{GeoPoint, MERCATOR_MAX_LAT_DEG};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn center_lands_on_translate() {
        let m = MercatorProjection::new(&ProjectionParams::flat_default());
        let (p, visible) = m.project(GeoPoint::new(0.0, 25.0));
        assert!(visible);
        assert_close(p.x, 480.0, 1e-9);
        assert_close(p.y, 250.0, 1e-9);
    }

    #[test]
    fn latitude_is_clamped() {
        assert_eq!(
            mercator_raw(GeoPoint::new(0.0, 90.0)),
            mercator_raw(GeoPoint::new(0.0, MERCATOR_MAX_LAT_DEG))
        );
        assert!(mercator_raw(GeoPoint::new(0.0, -90.0)).y.is_finite());
    }

    #[test]
    fn line_is_cut_at_antimeridian() {
        let pieces = split_line(&[GeoPoint::new(170.0, 10.0), GeoPoint::new(-170.0, 20.0)]);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0].last().map(|p| p.longitude), Some(180.0));
        assert_eq!(pieces[1].first().map(|p| p.longitude), Some(-180.0));
        assert_close(pieces[0][1].latitude, 15.0, 1e-9);
    }

    #[test]
    fn ring_across_antimeridian_becomes_two_pieces() {
        let ring = [
            GeoPoint::new(175.0, -10.0),
            GeoPoint::new(-175.0, -10.0),
            GeoPoint::new(-175.0, -20.0),
            GeoPoint::new(175.0, -20.0),
        ];
        let pieces = split_ring(&ring);
        assert_eq!(pieces.len(), 2);
        for piece in &pieces {
            let side = piece[0].longitude.signum();
            assert!(piece.iter().all(|p| p.longitude.signum() == side));
        }
    }

    #[test]
    fn polar_ring_closes_over_the_pole() {
        let ring: Vec<GeoPoint> = (0..12)
            .map(|i| GeoPoint::new(-180.0 + 15.0 + 30.0 * i as f64, -75.0))
            .collect();
        let pieces = split_ring(&ring);
        assert_eq!(pieces.len(), 1);
        let lats: Vec<f64> = pieces[0].iter().map(|p| p.latitude).collect();
        assert_eq!(lats.iter().filter(|&&l| l == -90.0).count(), 2);
    }
}
