use flows::Color;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct Style {
    pub stroke: Option<Color>,
    pub fill: Option<Color>,
}

impl Style {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn stroke(color: Color) -> Self {
        Self {
            stroke: Some(color),
            fill: None,
        }
    }

    pub fn fill(color: Color) -> Self {
        Self {
            stroke: None,
            fill: Some(color),
        }
    }

    /// Inline CSS, e.g. `stroke: #008000;`.
    pub fn to_css(&self) -> String {
        let mut out = String::new();
        if let Some(c) = self.stroke {
            out.push_str(&format!("stroke: {c};"));
        }
        if let Some(c) = self.fill {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(&format!("fill: {c};"));
        }
        out
    }
}
