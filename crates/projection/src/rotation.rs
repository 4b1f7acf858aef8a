use foundation::math::{GeoPoint, Vec3};
use serde::{Deserialize, Serialize};

/// Globe rotation in degrees: `lambda` spins around the polar axis, `phi`
/// tilts the result towards or away from the viewer.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rotation {
    pub lambda: f64,
    pub phi: f64,
}

impl Rotation {
    pub const IDENTITY: Rotation = Rotation {
        lambda: 0.0,
        phi: 0.0,
    };

    pub fn new(lambda: f64, phi: f64) -> Self {
        Self { lambda, phi }
    }

    pub fn is_finite(&self) -> bool {
        self.lambda.is_finite() && self.phi.is_finite()
    }

    /// Unit vector of `p` after rotation. `x > 0` is the hemisphere facing
    /// the viewer.
    pub fn rotated_vector(&self, p: GeoPoint) -> Vec3 {
        let lam = (p.longitude + self.lambda).to_radians();
        let phi = p.latitude.to_radians();
        let cos_phi = phi.cos();
        let x = lam.cos() * cos_phi;
        let y = lam.sin() * cos_phi;
        let z = phi.sin();
        let (sin_d, cos_d) = self.phi.to_radians().sin_cos();
        Vec3::new(x * cos_d - z * sin_d, y, z * cos_d + x * sin_d)
    }

    pub fn apply(&self, p: GeoPoint) -> GeoPoint {
        let v = self.rotated_vector(p);
        GeoPoint::new(
            v.y.atan2(v.x).to_degrees(),
            v.z.clamp(-1.0, 1.0).asin().to_degrees(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::Rotation;
    use foundation::math::GeoPoint;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn identity_keeps_points() {
        let p = GeoPoint::new(30.0, -20.0);
        let q = Rotation::IDENTITY.apply(p);
        assert_close(q.longitude, 30.0, 1e-9);
        assert_close(q.latitude, -20.0, 1e-9);
    }

    #[test]
    fn lambda_shifts_longitude() {
        let q = Rotation::new(-90.0, 0.0).apply(GeoPoint::new(90.0, 10.0));
        assert_close(q.longitude, 0.0, 1e-9);
        assert_close(q.latitude, 10.0, 1e-9);
    }

    #[test]
    fn phi_tilts_towards_pole() {
        // Tilting by 90 brings the point (0, 0) up to the north pole.
        let q = Rotation::new(0.0, 90.0).apply(GeoPoint::new(0.0, 0.0));
        assert_close(q.latitude, 90.0, 1e-9);
    }
}
