use foundation::math::GeoPoint;
use projection::{Geometry, MapFeature};
use serde_json::{Map, Value};

use crate::map::MapFormatError;

/// Accepts a `FeatureCollection` or a single `Feature`.
pub fn features_from_geojson_value(value: Value) -> Result<Vec<MapFeature>, MapFormatError> {
    let obj = value
        .as_object()
        .ok_or_else(|| MapFormatError::UnsupportedDocument("non-object".to_string()))?;
    let ty = obj.get("type").and_then(|v| v.as_str()).unwrap_or_default();
    match ty {
        "Feature" => Ok(vec![parse_feature(0, &value)?]),
        "FeatureCollection" => {
            let features_val = obj
                .get("features")
                .and_then(|v| v.as_array())
                .ok_or_else(|| MapFormatError::InvalidFeature {
                    index: 0,
                    reason: "FeatureCollection missing features array".to_string(),
                })?;
            features_val
                .iter()
                .enumerate()
                .map(|(index, feat)| parse_feature(index, feat))
                .collect()
        }
        other => Err(MapFormatError::UnsupportedDocument(other.to_string())),
    }
}

fn parse_feature(index: usize, feat_val: &Value) -> Result<MapFeature, MapFormatError> {
    let invalid = |reason: String| MapFormatError::InvalidFeature { index, reason };
    let feat_obj = feat_val
        .as_object()
        .ok_or_else(|| invalid("feature must be an object".to_string()))?;

    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| invalid("feature missing type".to_string()))?;
    if feat_type != "Feature" {
        return Err(invalid(format!("unexpected feature type: {feat_type}")));
    }

    let geometry_val = feat_obj
        .get("geometry")
        .ok_or_else(|| invalid("feature missing geometry".to_string()))?;
    let geometry = parse_geometry(geometry_val).map_err(invalid)?;

    Ok(MapFeature {
        id: feature_id(feat_obj),
        name: feature_name(feat_obj.get("properties")),
        geometry,
    })
}

pub(crate) fn feature_id(obj: &Map<String, Value>) -> Option<String> {
    match obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

pub(crate) fn feature_name(properties: Option<&Value>) -> Option<String> {
    let props = properties?.as_object()?;
    ["name", "NAME", "admin"]
        .iter()
        .find_map(|k| props.get(*k).and_then(Value::as_str))
        .map(str::to_string)
}

fn parse_geometry(value: &Value) -> Result<Geometry, String> {
    let obj = value
        .as_object()
        .ok_or("geometry must be an object".to_string())?;
    let ty = obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;

    let coords = obj
        .get("coordinates")
        .ok_or("geometry missing coordinates".to_string())?;

    match ty {
        "Point" => Ok(Geometry::Point(parse_point(coords)?)),
        "MultiPoint" => Ok(Geometry::MultiPoint(parse_points(coords)?)),
        "LineString" => Ok(Geometry::LineString(parse_points(coords)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(parse_rings(coords)?)),
        "Polygon" => Ok(Geometry::Polygon(parse_rings(coords)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(parse_multi_polygon(coords)?)),
        other => Err(format!("unsupported geometry type: {other}")),
    }
}

fn parse_point(coords: &Value) -> Result<GeoPoint, String> {
    let arr = coords
        .as_array()
        .ok_or("Point coordinates must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("Point coordinates must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("Point lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("Point lat must be a number".to_string())?;
    Ok(GeoPoint::new(lon, lat))
}

fn parse_points(coords: &Value) -> Result<Vec<GeoPoint>, String> {
    let arr = coords
        .as_array()
        .ok_or("coordinates must be an array".to_string())?;
    arr.iter().map(parse_point).collect()
}

fn parse_rings(coords: &Value) -> Result<Vec<Vec<GeoPoint>>, String> {
    let rings = coords
        .as_array()
        .ok_or("coordinates must be an array of point lists".to_string())?;
    rings.iter().map(parse_points).collect()
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<Vec<Vec<GeoPoint>>>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    polys.iter().map(parse_rings).collect()
}
