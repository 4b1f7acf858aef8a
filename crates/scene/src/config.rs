use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Arrowhead circumradius in screen pixels.
    pub arrow_size: f64,
    /// Source marker radius in screen pixels.
    pub marker_radius: f64,
    /// Extra pick distance around strokes.
    pub hit_tolerance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            arrow_size: 4.0,
            marker_radius: 3.0,
            hit_tolerance: 3.0,
        }
    }
}
