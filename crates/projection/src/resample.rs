use foundation::math::{GeoPoint, great_circle_points};

/// Densifies a polyline along great circles so no step exceeds `step_deg`.
pub fn resample_line(points: &[GeoPoint], step_deg: f64) -> Vec<GeoPoint> {
    let mut out = Vec::with_capacity(points.len());
    let Some(&first) = points.first() else {
        return out;
    };
    out.push(first);
    for w in points.windows(2) {
        let arc = great_circle_points(w[0], w[1], step_deg);
        out.extend(arc.into_iter().skip(1));
    }
    out
}

/// Densifies an open ring, including the closing edge. The result is open.
pub fn resample_ring(ring: &[GeoPoint], step_deg: f64) -> Vec<GeoPoint> {
    let (Some(&first), Some(&last)) = (ring.first(), ring.last()) else {
        return Vec::new();
    };
    let mut out = resample_line(ring, step_deg);
    let closing = great_circle_points(last, first, step_deg);
    // Skip both endpoints: `last` is already present and `first` opens the ring.
    let inner = closing.len().saturating_sub(2);
    out.extend(closing.into_iter().skip(1).take(inner));
    out
}

/// Bisects the great circle from `a` to `b` for the point where `inside`
/// flips. `a` must satisfy `inside` and `b` must not.
pub fn bisect_boundary(
    a: GeoPoint,
    b: GeoPoint,
    inside: impl Fn(GeoPoint) -> bool,
) -> GeoPoint {
    let (mut lo, mut hi) = (0.0f64, 1.0f64);
    for _ in 0..32 {
        let mid = 0.5 * (lo + hi);
        if inside(foundation::math::interpolate(a, b, mid)) {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    foundation::math::interpolate(a, b, 0.5 * (lo + hi))
}

#[cfg(test)]
mod tests {
    use super::{bisect_boundary, resample_line, resample_ring};
    use foundation::math::GeoPoint;

    #[test]
    fn resampled_line_keeps_vertices() {
        let pts = [GeoPoint::new(0.0, 0.0), GeoPoint::new(10.0, 0.0), GeoPoint::new(10.0, 10.0)];
        let out = resample_line(&pts, 1.0);
        assert_eq!(out.first(), Some(&pts[0]));
        assert_eq!(out.last(), Some(&pts[2]));
        assert!(out.contains(&pts[1]));
        assert_eq!(out.len(), 21);
    }

    #[test]
    fn resampled_ring_covers_closing_edge() {
        let ring = [GeoPoint::new(0.0, 0.0), GeoPoint::new(4.0, 0.0), GeoPoint::new(0.0, 4.0)];
        let out = resample_ring(&ring, 1.0);
        assert!(out.len() > 12);
        assert_ne!(out.last(), Some(&ring[0]));
    }

    #[test]
    fn bisection_finds_boundary() {
        let p = bisect_boundary(GeoPoint::new(0.0, 0.0), GeoPoint::new(20.0, 0.0), |g| {
            g.longitude < 12.5
        });
        assert!((p.longitude - 12.5).abs() < 1e-6);
    }
}
