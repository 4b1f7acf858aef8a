pub mod role;
pub mod shape;
pub mod style;

pub use role::*;
pub use shape::*;
pub use style::*;
