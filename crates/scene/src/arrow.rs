use foundation::math::Vec2;
use projection::PathDescriptor;

const WING_ANGLE: f64 = 3.0 * std::f64::consts::FRAC_PI_4;

/// Triangle at the end of `path` pointing along its final direction.
///
/// The direction is taken between the point `size` before the end and the end
/// itself, measured within the last subpath only. When that subpath is shorter
/// than `size` the last segment's direction is used. The three corners sit on
/// a circle of radius `size` around the end at 0, +135 and -135 degrees from
/// that direction.
pub fn arrowhead_points(path: &PathDescriptor, size: f64) -> Option<[Vec2; 3]> {
    let end = path.end_point()?;
    let tail = PathDescriptor::new(path.subpaths.last().cloned().into_iter().collect());
    let total = tail.length();
    let sampled = if total >= size {
        tail.point_at_length(total - size)
            .filter(|start| start.distance(end) > f64::EPSILON)
    } else {
        None
    };
    let angle = match sampled {
        Some(start) => start.angle_to(end),
        None => path.terminal_tangent().map_or(0.0, |(_, angle)| angle),
    };
    let corner = |offset: f64| end + Vec2::from_angle(angle + offset) * size;
    Some([corner(0.0), corner(WING_ANGLE), corner(-WING_ANGLE)])
}

pub fn centroid(points: &[Vec2]) -> Option<Vec2> {
    if points.is_empty() {
        return None;
    }
    let sum = points.iter().fold(Vec2::ZERO, |acc, p| acc + *p);
    Some(sum * (1.0 / points.len() as f64))
}

#[cfg(test)]
mod tests {
    use super::{arrowhead_points, centroid};
    use foundation::math::{GeoPoint, Vec2};
    use projection::{GeoProjector, Geometry, PathDescriptor, SubPath};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn points_along_final_segment() {
        let path = PathDescriptor::new(vec![SubPath::open(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
        ])]);
        let [tip, left, right] = arrowhead_points(&path, 4.0).expect("arrow");
        assert_close(tip.x, 10.0, 1e-9);
        assert_close(tip.y, 14.0, 1e-9);
        let half = 4.0 * std::f64::consts::FRAC_1_SQRT_2;
        assert_close(left.x, 10.0 - half, 1e-9);
        assert_close(left.y, 10.0 - half, 1e-9);
        assert_close(right.x, 10.0 + half, 1e-9);
        assert_close(right.y, 10.0 - half, 1e-9);

        let c = centroid(&[tip, left, right]).expect("centroid");
        assert!(c.distance(Vec2::new(10.0, 10.0)) <= 4.0);
    }

    #[test]
    fn degenerate_path_still_yields_arrow_at_end() {
        let path = PathDescriptor::new(vec![SubPath::open(vec![Vec2::new(3.0, 3.0), Vec2::new(3.0, 3.0)])]);
        let [tip, ..] = arrowhead_points(&path, 4.0).expect("arrow");
        assert_close(tip.x, 7.0, 1e-9);
        assert_close(tip.y, 3.0, 1e-9);
        assert!(arrowhead_points(&PathDescriptor::empty(), 4.0).is_none());
    }

    #[test]
    fn short_final_subpath_uses_its_own_direction() {
        let path = PathDescriptor::new(vec![
            SubPath::open(vec![Vec2::new(900.0, 50.0), Vec2::new(960.0, 50.0)]),
            SubPath::open(vec![Vec2::new(0.0, 50.0), Vec2::new(1.0, 50.0)]),
        ]);
        let [tip, ..] = arrowhead_points(&path, 4.0).expect("arrow");
        assert_close(tip.x, 5.0, 1e-9);
        assert_close(tip.y, 50.0, 1e-9);
    }

    #[test]
    fn antimeridian_route_arrow_follows_terminal_tangent() {
        let route = GeoProjector::default().path_for(&Geometry::route(
            GeoPoint::new(170.0, 0.0),
            GeoPoint::new(-179.99, 0.0),
        ));
        assert!(route.subpaths.len() > 1, "route should be split at the antimeridian");
        let (end, heading) = route.terminal_tangent().expect("tangent");
        let [tip, ..] = arrowhead_points(&route, 4.0).expect("arrow");
        assert_close(end.angle_to(tip), heading, 1e-9);
    }
}
