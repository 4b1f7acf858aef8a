//! Flow record model: validation, time-indexed datasets, the byte-size color
//! scale and hover overlay content.

pub mod content;
pub mod dataset;
pub mod record;
pub mod scale;
pub mod temporal;

pub use content::*;
pub use dataset::*;
pub use record::*;
pub use scale::*;
pub use temporal::*;
