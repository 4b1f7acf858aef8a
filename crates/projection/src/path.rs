use foundation::Aabb2;
use foundation::math::Vec2;

use crate::affine::Affine;

/// One polyline of a path. Closed subpaths include the implicit segment
/// from the last point back to the first in their length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SubPath {
    pub points: Vec<Vec2>,
    pub closed: bool,
}

impl SubPath {
    pub fn open(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: false,
        }
    }

    pub fn closed(points: Vec<Vec2>) -> Self {
        Self {
            points,
            closed: true,
        }
    }

    fn segments(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let closing = match (self.closed, self.points.first(), self.points.last()) {
            (true, Some(&first), Some(&last)) if self.points.len() > 2 => Some((last, first)),
            _ => None,
        };
        self.points
            .windows(2)
            .map(|w| (w[0], w[1]))
            .chain(closing)
    }

    pub fn length(&self) -> f64 {
        self.segments().map(|(a, b)| a.distance(b)).sum()
    }
}

/// Screen-space path geometry, the equivalent of an SVG path `d` attribute.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PathDescriptor {
    pub subpaths: Vec<SubPath>,
}

impl PathDescriptor {
    pub fn new(subpaths: Vec<SubPath>) -> Self {
        let subpaths = subpaths
            .into_iter()
            .filter(|s| !s.points.is_empty())
            .collect();
        Self { subpaths }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.subpaths.is_empty()
    }

    pub fn point_count(&self) -> usize {
        self.subpaths.iter().map(|s| s.points.len()).sum()
    }

    pub fn length(&self) -> f64 {
        self.subpaths.iter().map(SubPath::length).sum()
    }

    pub fn start_point(&self) -> Option<Vec2> {
        self.subpaths.first().and_then(|s| s.points.first().copied())
    }

    pub fn end_point(&self) -> Option<Vec2> {
        let last = self.subpaths.last()?;
        if last.closed {
            return last.points.first().copied();
        }
        last.points.last().copied()
    }

    /// Point at arc length `distance` from the start, clamped to the path.
    /// Moves between subpaths do not count towards the length.
    pub fn point_at_length(&self, distance: f64) -> Option<Vec2> {
        let mut remaining = distance.max(0.0);
        let mut last = None;
        for sub in &self.subpaths {
            if last.is_none() {
                last = sub.points.first().copied();
            }
            for (a, b) in sub.segments() {
                let len = a.distance(b);
                if remaining <= len {
                    if len <= f64::EPSILON {
                        return Some(a);
                    }
                    return Some(a.lerp(b, remaining / len));
                }
                remaining -= len;
                last = Some(b);
            }
        }
        last
    }

    /// End point and direction angle (radians, screen space) of the last
    /// non-degenerate segment.
    pub fn terminal_tangent(&self) -> Option<(Vec2, f64)> {
        let end = self.end_point()?;
        let last = self.subpaths.last()?;
        let mut pts: Vec<Vec2> = last.points.clone();
        if last.closed {
            if let Some(&first) = pts.first() {
                pts.push(first);
            }
        }
        pts.windows(2)
            .rev()
            .find(|w| w[0].distance(w[1]) > f64::EPSILON)
            .map(|w| (end, w[0].angle_to(w[1])))
    }

    pub fn bounds(&self) -> Option<Aabb2> {
        Aabb2::from_points(self.subpaths.iter().flat_map(|s| s.points.iter().copied()))
    }

    pub fn transformed(&self, affine: &Affine) -> PathDescriptor {
        if affine.is_identity() {
            return self.clone();
        }
        PathDescriptor {
            subpaths: self
                .subpaths
                .iter()
                .map(|s| SubPath {
                    points: s.points.iter().map(|&p| affine.apply(p)).collect(),
                    closed: s.closed,
                })
                .collect(),
        }
    }

    /// Smallest distance from `p` to any segment (or lone point).
    pub fn distance_to(&self, p: Vec2) -> Option<f64> {
        let mut best: Option<f64> = None;
        for sub in &self.subpaths {
            let mut candidates: Vec<f64> = sub
                .segments()
                .map(|(a, b)| distance_to_segment(p, a, b))
                .collect();
            if sub.points.len() == 1 {
                candidates.push(p.distance(sub.points[0]));
            }
            for d in candidates {
                best = Some(best.map_or(d, |b: f64| b.min(d)));
            }
        }
        best
    }

    /// Even-odd fill test over the closed subpaths.
    pub fn fill_contains(&self, p: Vec2) -> bool {
        let mut inside = false;
        for sub in self.subpaths.iter().filter(|s| s.closed) {
            if polygon_contains(&sub.points, p) {
                inside = !inside;
            }
        }
        inside
    }

    /// SVG path data, e.g. `M1,2L3,4Z`.
    pub fn to_svg(&self) -> String {
        let mut out = String::new();
        for sub in &self.subpaths {
            for (i, p) in sub.points.iter().enumerate() {
                out.push(if i == 0 { 'M' } else { 'L' });
                out.push_str(&format_coord(p.x));
                out.push(',');
                out.push_str(&format_coord(p.y));
            }
            if sub.closed {
                out.push('Z');
            }
        }
        out
    }
}

pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len2 = ab.dot(ab);
    if len2 <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Crossing-number point-in-polygon test; the ring is implicitly closed.
pub fn polygon_contains(ring: &[Vec2], p: Vec2) -> bool {
    if ring.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = ring.len() - 1;
    for i in 0..ring.len() {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) {
            let x = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Fixed three-decimal coordinate with trailing zeros trimmed.
pub fn format_coord(v: f64) -> String {
    let rounded = (v * 1000.0).round() / 1000.0;
    let s = format!("{rounded:.3}");
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".to_string() } else { s.to_string() }
}

#[cfg(test)]
mod tests {
    use super::{PathDescriptor, SubPath, polygon_contains};
    use crate::affine::Affine;
    use foundation::math::Vec2;
    use pretty_assertions::assert_eq;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    fn l_shape() -> PathDescriptor {
        PathDescriptor::new(vec![SubPath::open(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 5.0),
        ])])
    }

    #[test]
    fn length_and_point_at_length() {
        let p = l_shape();
        assert_close(p.length(), 15.0, 1e-12);
        assert_eq!(p.point_at_length(4.0), Some(Vec2::new(4.0, 0.0)));
        assert_eq!(p.point_at_length(12.0), Some(Vec2::new(10.0, 2.0)));
        assert_eq!(p.point_at_length(100.0), Some(Vec2::new(10.0, 5.0)));
        assert_eq!(p.point_at_length(-3.0), Some(Vec2::new(0.0, 0.0)));
    }

    #[test]
    fn terminal_tangent_points_along_last_segment() {
        let (end, angle) = l_shape().terminal_tangent().expect("tangent");
        assert_eq!(end, Vec2::new(10.0, 5.0));
        assert_close(angle, std::f64::consts::FRAC_PI_2, 1e-12);
    }

    #[test]
    fn svg_serialization_trims_decimals() {
        let p = PathDescriptor::new(vec![
            SubPath::open(vec![Vec2::new(1.5, 2.0), Vec2::new(3.25, -0.0001)]),
            SubPath::closed(vec![Vec2::new(0.0, 0.0), Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0)]),
        ]);
        assert_eq!(p.to_svg(), "M1.5,2L3.25,0M0,0L1,0L0,1Z");
    }

    #[test]
    fn transformed_applies_affine_and_keeps_shape() {
        let p = l_shape().transformed(&Affine::new(2.0, Vec2::new(1.0, 1.0)));
        assert_close(p.length(), 30.0, 1e-12);
        assert_eq!(p.start_point(), Some(Vec2::new(1.0, 1.0)));
        let b = p.bounds().expect("bounds");
        assert_eq!(b.max, Vec2::new(21.0, 11.0));
    }

    #[test]
    fn hit_helpers() {
        let p = l_shape();
        assert_close(p.distance_to(Vec2::new(5.0, 3.0)).expect("d"), 3.0, 1e-12);
        let tri = [Vec2::new(0.0, 0.0), Vec2::new(4.0, 0.0), Vec2::new(0.0, 4.0)];
        assert!(polygon_contains(&tri, Vec2::new(1.0, 1.0)));
        assert!(!polygon_contains(&tri, Vec2::new(3.0, 3.0)));
    }

    #[test]
    fn empty_path_has_no_points() {
        let p = PathDescriptor::new(vec![SubPath::open(Vec::new())]);
        assert!(p.is_empty());
        assert_eq!(p.point_at_length(1.0), None);
        assert_eq!(p.terminal_tangent(), None);
        assert_eq!(p.to_svg(), "");
    }
}
