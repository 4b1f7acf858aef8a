pub mod event_bus;
pub mod interval;
pub mod playback;

pub use event_bus::*;
pub use interval::*;
pub use playback::*;
