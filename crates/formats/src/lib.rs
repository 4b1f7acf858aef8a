//! Wire formats consumed by the viewer: flow records and map geometry.

pub mod flow_json;
pub mod geojson;
pub mod map;
pub mod topojson;

pub use flow_json::*;
pub use geojson::*;
pub use map::*;
pub use topojson::*;
