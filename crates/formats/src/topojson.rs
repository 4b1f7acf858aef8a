//! TopoJSON topologies: shared arcs, optionally quantized and delta-encoded.

use std::collections::BTreeMap;

use foundation::math::GeoPoint;
use projection::{Geometry, MapFeature};
use serde::Deserialize;
use serde_json::Value;

use crate::geojson::{feature_id, feature_name};
use crate::map::MapFormatError;

#[derive(Debug, Deserialize)]
struct Topology {
    #[serde(default)]
    transform: Option<Transform>,
    #[serde(default)]
    arcs: Vec<Vec<Vec<f64>>>,
    #[serde(default)]
    objects: BTreeMap<String, Value>,
}

#[derive(Debug, Copy, Clone, Deserialize)]
struct Transform {
    scale: [f64; 2],
    translate: [f64; 2],
}

impl Transform {
    fn apply(&self, x: f64, y: f64) -> GeoPoint {
        GeoPoint::new(
            x * self.scale[0] + self.translate[0],
            y * self.scale[1] + self.translate[1],
        )
    }
}

/// Arcs decoded to absolute coordinates.
struct ArcTable {
    arcs: Vec<Vec<GeoPoint>>,
}

impl ArcTable {
    fn decode(raw: &[Vec<Vec<f64>>], transform: Option<Transform>) -> Self {
        let arcs = raw
            .iter()
            .map(|arc| {
                let (mut x, mut y) = (0.0, 0.0);
                arc.iter()
                    .filter(|p| p.len() >= 2)
                    .map(|p| match transform {
                        Some(t) => {
                            x += p[0];
                            y += p[1];
                            t.apply(x, y)
                        }
                        None => GeoPoint::new(p[0], p[1]),
                    })
                    .collect()
            })
            .collect();
        Self { arcs }
    }

    /// Negative indices address arc `!i`, traversed backwards.
    fn arc(&self, index: i64) -> Result<Vec<GeoPoint>, MapFormatError> {
        let (slot, reversed) = if index >= 0 {
            (index as usize, false)
        } else {
            ((!index) as usize, true)
        };
        let arc = self
            .arcs
            .get(slot)
            .ok_or(MapFormatError::InvalidArc { index })?;
        let mut points = arc.clone();
        if reversed {
            points.reverse();
        }
        Ok(points)
    }

    /// Joins arcs end to start, dropping each shared junction point once.
    fn stitch(&self, indices: &[i64]) -> Result<Vec<GeoPoint>, MapFormatError> {
        let mut out: Vec<GeoPoint> = Vec::new();
        for &index in indices {
            let points = self.arc(index)?;
            let skip = usize::from(!out.is_empty());
            out.extend(points.into_iter().skip(skip));
        }
        Ok(out)
    }
}

pub fn features_from_topology_value(value: Value, object: &str) -> Result<Vec<MapFeature>, MapFormatError> {
    let topology: Topology = serde_json::from_value(value).map_err(|e| MapFormatError::Json(e.to_string()))?;
    let table = ArcTable::decode(&topology.arcs, topology.transform);
    let root = topology
        .objects
        .get(object)
        .ok_or_else(|| MapFormatError::MissingObject(object.to_string()))?;

    let members: Vec<&Value> = match root.get("type").and_then(Value::as_str) {
        Some("GeometryCollection") => root
            .get("geometries")
            .and_then(Value::as_array)
            .map(|g| g.iter().collect())
            .unwrap_or_default(),
        _ => vec![root],
    };

    let mut features = Vec::with_capacity(members.len());
    for (index, member) in members.into_iter().enumerate() {
        let invalid = |reason: String| MapFormatError::InvalidFeature { index, reason };
        let obj = member
            .as_object()
            .ok_or_else(|| invalid("geometry must be an object".to_string()))?;
        let Some(geometry) = decode_geometry(obj, &table, topology.transform).map_err(|e| match e {
            GeometryError::Map(err) => err,
            GeometryError::Shape(reason) => invalid(reason),
        })?
        else {
            continue;
        };
        features.push(MapFeature {
            id: feature_id(obj),
            name: feature_name(obj.get("properties")),
            geometry,
        });
    }
    Ok(features)
}

enum GeometryError {
    Map(MapFormatError),
    Shape(String),
}

impl From<MapFormatError> for GeometryError {
    fn from(e: MapFormatError) -> Self {
        GeometryError::Map(e)
    }
}

fn indices(value: Option<&Value>) -> Result<Vec<i64>, GeometryError> {
    value
        .and_then(Value::as_array)
        .ok_or_else(|| GeometryError::Shape("arcs must be an array".to_string()))?
        .iter()
        .map(|v| {
            v.as_i64()
                .ok_or_else(|| GeometryError::Shape("arc index must be an integer".to_string()))
        })
        .collect()
}

fn nested(value: Option<&Value>) -> Result<Vec<&Value>, GeometryError> {
    Ok(value
        .and_then(Value::as_array)
        .ok_or_else(|| GeometryError::Shape("arcs must be an array".to_string()))?
        .iter()
        .collect())
}

fn position(value: &Value, transform: Option<Transform>) -> Result<GeoPoint, GeometryError> {
    let arr = value
        .as_array()
        .filter(|a| a.len() >= 2)
        .ok_or_else(|| GeometryError::Shape("position must be [x, y]".to_string()))?;
    let (x, y) = match (arr[0].as_f64(), arr[1].as_f64()) {
        (Some(x), Some(y)) => (x, y),
        _ => return Err(GeometryError::Shape("position must be numeric".to_string())),
    };
    Ok(match transform {
        Some(t) => t.apply(x, y),
        None => GeoPoint::new(x, y),
    })
}

/// `Ok(None)` for null geometries, which carry no shape.
fn decode_geometry(
    obj: &serde_json::Map<String, Value>,
    table: &ArcTable,
    transform: Option<Transform>,
) -> Result<Option<Geometry>, GeometryError> {
    let ty = obj.get("type").and_then(Value::as_str);
    let arcs = obj.get("arcs");
    let geometry = match ty {
        None => return Ok(None),
        Some("Point") => {
            let coords = obj
                .get("coordinates")
                .ok_or_else(|| GeometryError::Shape("Point missing coordinates".to_string()))?;
            Geometry::Point(position(coords, transform)?)
        }
        Some("MultiPoint") => {
            let coords = obj
                .get("coordinates")
                .and_then(Value::as_array)
                .ok_or_else(|| GeometryError::Shape("MultiPoint missing coordinates".to_string()))?;
            Geometry::MultiPoint(
                coords
                    .iter()
                    .map(|c| position(c, transform))
                    .collect::<Result<_, _>>()?,
            )
        }
        Some("LineString") => Geometry::LineString(table.stitch(&indices(arcs)?)?),
        Some("MultiLineString") => Geometry::MultiLineString(rings(nested(arcs)?, table)?),
        Some("Polygon") => Geometry::Polygon(rings(nested(arcs)?, table)?),
        Some("MultiPolygon") => Geometry::MultiPolygon(
            nested(arcs)?
                .into_iter()
                .map(|poly| rings(nested(Some(poly))?, table))
                .collect::<Result<_, _>>()?,
        ),
        Some(other) => return Err(GeometryError::Shape(format!("unsupported geometry type: {other}"))),
    };
    Ok(Some(geometry))
}

fn rings(lists: Vec<&Value>, table: &ArcTable) -> Result<Vec<Vec<GeoPoint>>, GeometryError> {
    lists
        .into_iter()
        .map(|list| Ok(table.stitch(&indices(Some(list))?)?))
        .collect()
}
