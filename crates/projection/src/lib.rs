//! Geographic to screen projection.
//!
//! A `GeoProjector` is a pure value: it is derived from a projection kind, a
//! rotation and an affine zoom/pan transform, and is rebuilt (never mutated)
//! whenever any of those change.

pub mod affine;
pub mod flat;
pub mod geometry;
pub mod globe;
pub mod kind;
pub mod options;
pub mod path;
pub mod projector;
pub mod resample;
pub mod rotation;

pub use affine::*;
pub use geometry::*;
pub use kind::*;
pub use options::*;
pub use path::*;
pub use projector::*;
pub use rotation::*;
