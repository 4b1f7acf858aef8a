//! Boundary geometry payloads. GeoJSON and TopoJSON are told apart by their
//! top-level `type`.

use projection::MapFeature;
use serde_json::Value;
use tracing::info;

use crate::geojson::features_from_geojson_value;
use crate::topojson::features_from_topology_value;

/// TopoJSON object read when none is named.
pub const DEFAULT_TOPOLOGY_OBJECT: &str = "countries";

#[derive(Debug, Clone, PartialEq)]
pub enum MapFormatError {
    Json(String),
    UnsupportedDocument(String),
    MissingObject(String),
    InvalidFeature { index: usize, reason: String },
    InvalidArc { index: i64 },
}

impl std::fmt::Display for MapFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MapFormatError::Json(e) => write!(f, "map payload is not JSON: {e}"),
            MapFormatError::UnsupportedDocument(ty) => write!(
                f,
                "unsupported map document type '{ty}' (expected FeatureCollection, Feature or Topology)"
            ),
            MapFormatError::MissingObject(name) => write!(f, "topology has no object named '{name}'"),
            MapFormatError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
            MapFormatError::InvalidArc { index } => write!(f, "arc index {index} is out of range"),
        }
    }
}

impl std::error::Error for MapFormatError {}

pub fn parse_map_features(payload: &str) -> Result<Vec<MapFeature>, MapFormatError> {
    parse_map_features_with(payload, DEFAULT_TOPOLOGY_OBJECT)
}

/// Like `parse_map_features`, reading `object` from a topology.
pub fn parse_map_features_with(payload: &str, object: &str) -> Result<Vec<MapFeature>, MapFormatError> {
    let value: Value = serde_json::from_str(payload).map_err(|e| MapFormatError::Json(e.to_string()))?;
    let ty = value
        .get("type")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let features = match ty.as_str() {
        "Topology" => features_from_topology_value(value, object)?,
        "FeatureCollection" | "Feature" => features_from_geojson_value(value)?,
        _ => return Err(MapFormatError::UnsupportedDocument(ty)),
    };
    info!(kind = %ty, features = features.len(), "map geometry loaded");
    Ok(features)
}

#[cfg(test)]
mod tests {
    use super::{MapFormatError, parse_map_features};

    #[test]
    fn rejects_unknown_documents() {
        assert_eq!(
            parse_map_features(r#"{"type": "Sphere"}"#).unwrap_err(),
            MapFormatError::UnsupportedDocument("Sphere".to_string())
        );
        assert!(matches!(parse_map_features("[").unwrap_err(), MapFormatError::Json(_)));
    }

    #[test]
    fn detects_both_document_kinds() {
        let geo = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(parse_map_features(geo).expect("geojson").is_empty());
        let topo = r#"{"type": "Topology", "arcs": [], "objects": {"countries": {"type": "GeometryCollection", "geometries": []}}}"#;
        assert!(parse_map_features(topo).expect("topojson").is_empty());
    }
}
