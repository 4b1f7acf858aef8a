use crate::math::Vec2;

/// Axis-aligned screen-space bounding box.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Aabb2 {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb2 {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Aabb2 { min, max }
    }

    pub fn from_points<I: IntoIterator<Item = Vec2>>(points: I) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = Aabb2::new(first, first);
        for p in iter {
            out.expand(p);
        }
        Some(out)
    }

    pub fn expand(&mut self, p: Vec2) {
        self.min.x = self.min.x.min(p.x);
        self.min.y = self.min.y.min(p.y);
        self.max.x = self.max.x.max(p.x);
        self.max.y = self.max.y.max(p.y);
    }

    pub fn inflate(self, by: f64) -> Self {
        Aabb2::new(
            Vec2::new(self.min.x - by, self.min.y - by),
            Vec2::new(self.max.x + by, self.max.y + by),
        )
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn from_points_spans_all_points() {
        let b = Aabb2::from_points([Vec2::new(1.0, 5.0), Vec2::new(-2.0, 3.0), Vec2::new(0.0, 7.0)])
            .expect("bounds");
        assert_eq!(b.min, Vec2::new(-2.0, 3.0));
        assert_eq!(b.max, Vec2::new(1.0, 7.0));
        assert!(b.contains(Vec2::new(0.0, 4.0)));
        assert!(!b.contains(Vec2::new(2.0, 4.0)));
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(Aabb2::from_points(std::iter::empty()).is_none());
    }
}
