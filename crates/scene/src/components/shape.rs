use foundation::Aabb2;
use foundation::math::Vec2;
use projection::{PathDescriptor, polygon_contains};

/// Drawable geometry in screen pixels.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Path(PathDescriptor),
    Circle { center: Vec2, radius: f64 },
    Polygon(Vec<Vec2>),
}

impl Shape {
    pub fn bounds(&self) -> Option<Aabb2> {
        match self {
            Shape::Path(path) => path.bounds(),
            Shape::Circle { center, radius } => Some(Aabb2::new(*center, *center).inflate(*radius)),
            Shape::Polygon(points) => Aabb2::from_points(points.iter().copied()),
        }
    }

    /// Strokes are hit within `tolerance`; circles and polygons by area.
    pub fn hit(&self, p: Vec2, tolerance: f64) -> bool {
        match self {
            Shape::Path(path) => {
                path.distance_to(p).is_some_and(|d| d <= tolerance) || path.fill_contains(p)
            }
            Shape::Circle { center, radius } => center.distance(p) <= *radius,
            Shape::Polygon(points) => polygon_contains(points, p),
        }
    }

    pub fn as_path(&self) -> Option<&PathDescriptor> {
        match self {
            Shape::Path(path) => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Shape;
    use foundation::math::Vec2;
    use projection::{PathDescriptor, SubPath};

    #[test]
    fn hit_rules_per_shape() {
        let line = Shape::Path(PathDescriptor::new(vec![SubPath::open(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(10.0, 0.0),
        ])]));
        assert!(line.hit(Vec2::new(5.0, 2.5), 3.0));
        assert!(!line.hit(Vec2::new(5.0, 3.5), 3.0));

        let dot = Shape::Circle {
            center: Vec2::new(1.0, 1.0),
            radius: 3.0,
        };
        assert!(dot.hit(Vec2::new(3.0, 1.0), 0.0));
        assert!(!dot.hit(Vec2::new(5.0, 1.0), 0.0));

        let tri = Shape::Polygon(vec![Vec2::new(0.0, 0.0), Vec2::new(6.0, 0.0), Vec2::new(0.0, 6.0)]);
        assert!(tri.hit(Vec2::new(1.0, 1.0), 0.0));
        assert_eq!(tri.bounds().map(|b| b.max), Some(Vec2::new(6.0, 6.0)));
    }
}
