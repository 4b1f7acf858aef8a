/// 8-bit sRGB color.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const GREEN: Color = Color::rgb(0, 128, 0);
    pub const RED: Color = Color::rgb(255, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Per-channel linear interpolation, `t` clamped to `[0, 1]`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color::rgb(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Byte size to stroke color.
pub trait ColorScale {
    fn color_for(&self, byte_size: u64) -> Color;
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinearColorScale {
    domain: (u64, u64),
    from: Color,
    to: Color,
}

impl LinearColorScale {
    /// Green at zero to red at `max_bytes`.
    pub fn new(max_bytes: u64) -> Self {
        Self::with_colors((0, max_bytes), Color::GREEN, Color::RED)
    }

    pub fn with_colors(domain: (u64, u64), from: Color, to: Color) -> Self {
        Self { domain, from, to }
    }
}

impl ColorScale for LinearColorScale {
    fn color_for(&self, byte_size: u64) -> Color {
        let (lo, hi) = self.domain;
        if hi <= lo {
            return self.from;
        }
        let t = (byte_size.saturating_sub(lo)) as f64 / (hi - lo) as f64;
        self.from.lerp(self.to, t)
    }
}
