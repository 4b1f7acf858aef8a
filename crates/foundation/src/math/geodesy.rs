use super::Vec3;

/// Largest latitude a Mercator map can show without going to infinity.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_779_806_59;

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    pub const fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite() && self.latitude.is_finite()
    }

    /// Finite, `|lon| <= 180` and `|lat| <= 90`.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.longitude.abs() <= 180.0 && self.latitude.abs() <= 90.0
    }

    /// Point on the unit sphere (x towards lon 0, z towards the north pole).
    pub fn to_unit_vector(self) -> Vec3 {
        let lon = self.longitude.to_radians();
        let lat = self.latitude.to_radians();
        Vec3::new(lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin())
    }

    pub fn from_unit_vector(v: Vec3) -> Self {
        let v = v.normalize();
        Self::new(v.y.atan2(v.x).to_degrees(), v.z.clamp(-1.0, 1.0).asin().to_degrees())
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_longitude(lon_deg: f64) -> f64 {
    (lon_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Central angle between two points (radians).
pub fn angular_distance(a: GeoPoint, b: GeoPoint) -> f64 {
    let va = a.to_unit_vector();
    let vb = b.to_unit_vector();
    va.cross(vb).length().atan2(va.dot(vb))
}

/// Point at fraction `t` along the great circle from `a` to `b`.
pub fn interpolate(a: GeoPoint, b: GeoPoint, t: f64) -> GeoPoint {
    let d = angular_distance(a, b);
    if d < 1e-12 {
        return a;
    }
    let sin_d = d.sin();
    if sin_d.abs() < 1e-9 {
        // Antipodal: every great circle qualifies; fall back to a plain lerp.
        return GeoPoint::new(
            a.longitude + (b.longitude - a.longitude) * t,
            a.latitude + (b.latitude - a.latitude) * t,
        );
    }
    let wa = ((1.0 - t) * d).sin() / sin_d;
    let wb = (t * d).sin() / sin_d;
    let v = a.to_unit_vector().scale(wa) + b.to_unit_vector().scale(wb);
    GeoPoint::from_unit_vector(v)
}

/// Samples the great circle from `a` to `b` with at most `max_step_deg`
/// between samples. The first and last samples are `a` and `b` exactly.
pub fn great_circle_points(a: GeoPoint, b: GeoPoint, max_step_deg: f64) -> Vec<GeoPoint> {
    let step = if max_step_deg.is_finite() && max_step_deg > 0.0 {
        max_step_deg
    } else {
        1.0
    };
    let d_deg = angular_distance(a, b).to_degrees();
    let n = ((d_deg / step - 1e-9).ceil() as usize).max(1);
    let mut out = Vec::with_capacity(n + 1);
    out.push(a);
    for i in 1..n {
        out.push(interpolate(a, b, i as f64 / n as f64));
    }
    out.push(b);
    out
}
