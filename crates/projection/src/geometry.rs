use foundation::math::GeoPoint;

/// Map geometry in geographic degrees. Polygons hold an exterior ring
/// followed by holes; rings may or may not repeat their first point.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Point(GeoPoint),
    MultiPoint(Vec<GeoPoint>),
    LineString(Vec<GeoPoint>),
    MultiLineString(Vec<Vec<GeoPoint>>),
    Polygon(Vec<Vec<GeoPoint>>),
    MultiPolygon(Vec<Vec<Vec<GeoPoint>>>),
}

impl Geometry {
    /// Two-point route from `from` to `to`.
    pub fn route(from: GeoPoint, to: GeoPoint) -> Self {
        Geometry::LineString(vec![from, to])
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
        }
    }

}

/// Boundary feature loaded once from map geometry; never mutated.
#[derive(Debug, Clone, PartialEq)]
pub struct MapFeature {
    pub id: Option<String>,
    pub name: Option<String>,
    pub geometry: Geometry,
}

impl MapFeature {
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            name: None,
            geometry,
        }
    }
}

/// Drops the duplicated closing vertex, if any.
pub fn open_ring(ring: &[GeoPoint]) -> &[GeoPoint] {
    match (ring.first(), ring.last()) {
        (Some(a), Some(b)) if ring.len() > 1 && a == b => &ring[..ring.len() - 1],
        _ => ring,
    }
}
