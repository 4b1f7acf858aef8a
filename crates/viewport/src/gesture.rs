use foundation::math::Vec2;

/// Pointer input already decoded by the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Gesture {
    /// Wheel or pinch. `factor > 1` zooms in. With an anchor the screen
    /// point under it stays fixed.
    Zoom { factor: f64, anchor: Option<Vec2> },
    /// Pointer drag: `position` is absolute within the viewport, `delta` the
    /// movement since the previous event. `modifier` is the rotate key.
    Drag {
        position: Vec2,
        delta: Vec2,
        modifier: bool,
    },
    Resize { width: f64, height: f64 },
}

/// What the host has to redo after a viewport change.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum Repaint {
    /// Only the zoom/pan affine changed; cached base geometry is reusable.
    Transform,
    /// The base projection changed; every path must be re-projected.
    Reproject,
}
