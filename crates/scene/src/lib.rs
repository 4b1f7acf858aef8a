//! Retained scene for the flow map: the surface contract, an in-memory world
//! with hover picking, and the synchronizers that keep it in step with the
//! data and the projector.

pub mod arrow;
pub mod boundaries;
pub mod components;
pub mod config;
pub mod entity;
pub mod overlay;
pub mod picking;
pub mod surface;
pub mod sync;
#[cfg(test)]
mod testing;
pub mod world;

pub use boundaries::*;
pub use config::*;
pub use entity::*;
pub use overlay::*;
pub use surface::*;
pub use sync::*;
pub use world::*;
