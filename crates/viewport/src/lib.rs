//! Zoom, pan and globe rotation state, driven by pointer gestures.

pub mod controller;
pub mod gesture;
pub mod state;

pub use controller::*;
pub use gesture::*;
pub use state::*;
