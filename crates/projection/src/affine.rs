use foundation::math::Vec2;

/// Uniform scale followed by a translation, applied on top of the base
/// projection: `screen = translate + scale * base`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Affine {
    pub scale: f64,
    pub translate: Vec2,
}

impl Default for Affine {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Affine {
    pub const IDENTITY: Affine = Affine {
        scale: 1.0,
        translate: Vec2::ZERO,
    };

    pub fn new(scale: f64, translate: Vec2) -> Self {
        Self { scale, translate }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    pub fn apply(&self, p: Vec2) -> Vec2 {
        self.translate + p * self.scale
    }

    pub fn invert(&self, p: Vec2) -> Vec2 {
        (p - self.translate) * (1.0 / self.scale)
    }
}

/// Maps raw projected coordinates (radians, y up) onto base screen pixels
/// (y down) so that the configured center lands on the configured translate.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenFrame {
    pub k: f64,
    pub dx: f64,
    pub dy: f64,
}

impl ScreenFrame {
    pub fn new(scale: f64, translate: [f64; 2], center_raw: Vec2) -> Self {
        Self {
            k: scale,
            dx: translate[0] - scale * center_raw.x,
            dy: translate[1] + scale * center_raw.y,
        }
    }

    pub fn to_screen(&self, raw: Vec2) -> Vec2 {
        Vec2::new(self.dx + self.k * raw.x, self.dy - self.k * raw.y)
    }
}

#[cfg(test)]
mod tests {
    use super::{Affine, ScreenFrame};
    use foundation::math::Vec2;

    #[test]
    fn affine_apply_and_invert() {
        let a = Affine::new(2.0, Vec2::new(10.0, -5.0));
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(a.apply(p), Vec2::new(16.0, 3.0));
        assert_eq!(a.invert(a.apply(p)), p);
        assert!(Affine::default().is_identity());
    }

    #[test]
    fn frame_puts_center_on_translate() {
        let f = ScreenFrame::new(150.0, [480.0, 250.0], Vec2::new(0.2, 0.4));
        assert_eq!(f.to_screen(Vec2::new(0.2, 0.4)), Vec2::new(480.0, 250.0));
    }
}
