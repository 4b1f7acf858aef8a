//! Flow map host: wires the viewport, playback, dataset and scene together.

pub mod config;
pub mod host;

pub use config::*;
pub use host::*;
