use geo::{
    Centroid, Geometry, GeometryCollection, MultiLineString, MultiPoint, MultiPolygon, Point,
};

use crate::error::ProcessingError;

/// Canonical storage shape for a feature's geometry.
///
/// Source files use simpler geometries than we store, so single-part
/// polygons and linestrings are widened to their multi-part equivalents:
/// every persisted geometry is exactly one of these five shapes, and a
/// feature can never hold more than one of them.
#[derive(Debug, Clone, PartialEq)]
pub enum GeometrySlot {
    Point(Point<f64>),
    MultiPoint(MultiPoint<f64>),
    MultiLineString(MultiLineString<f64>),
    MultiPolygon(MultiPolygon<f64>),
    GeometryCollection(GeometryCollection<f64>),
}

impl GeometrySlot {
    /// Wrap a geometry into its canonical storage shape.
    pub fn wrap(geometry: Geometry<f64>) -> Result<Self, ProcessingError> {
        match geometry {
            Geometry::Point(point) => Ok(GeometrySlot::Point(point)),
            Geometry::MultiPoint(points) => Ok(GeometrySlot::MultiPoint(points)),
            Geometry::LineString(line) => {
                Ok(GeometrySlot::MultiLineString(MultiLineString(vec![line])))
            }
            Geometry::MultiLineString(lines) => Ok(GeometrySlot::MultiLineString(lines)),
            Geometry::Polygon(polygon) => {
                Ok(GeometrySlot::MultiPolygon(MultiPolygon(vec![polygon])))
            }
            Geometry::MultiPolygon(polygons) => Ok(GeometrySlot::MultiPolygon(polygons)),
            Geometry::GeometryCollection(collection) => {
                Ok(GeometrySlot::GeometryCollection(collection))
            }
            _ => Err(ProcessingError::BadGeometry(
                "no canonical storage shape for line/rect/triangle primitives".to_string(),
            )),
        }
    }

    /// Name of the populated slot, e.g. "MultiPolygon".
    pub fn kind(&self) -> &'static str {
        match self {
            GeometrySlot::Point(_) => "Point",
            GeometrySlot::MultiPoint(_) => "MultiPoint",
            GeometrySlot::MultiLineString(_) => "MultiLineString",
            GeometrySlot::MultiPolygon(_) => "MultiPolygon",
            GeometrySlot::GeometryCollection(_) => "GeometryCollection",
        }
    }

    pub fn centroid(&self) -> Option<Point<f64>> {
        match self {
            GeometrySlot::Point(point) => Some(*point),
            GeometrySlot::MultiPoint(points) => points.centroid(),
            GeometrySlot::MultiLineString(lines) => lines.centroid(),
            GeometrySlot::MultiPolygon(polygons) => polygons.centroid(),
            GeometrySlot::GeometryCollection(collection) => collection.centroid(),
        }
    }

    pub fn as_multipolygon(&self) -> Option<&MultiPolygon<f64>> {
        match self {
            GeometrySlot::MultiPolygon(polygons) => Some(polygons),
            _ => None,
        }
    }

    pub fn to_geometry(&self) -> Geometry<f64> {
        match self {
            GeometrySlot::Point(point) => Geometry::Point(*point),
            GeometrySlot::MultiPoint(points) => Geometry::MultiPoint(points.clone()),
            GeometrySlot::MultiLineString(lines) => Geometry::MultiLineString(lines.clone()),
            GeometrySlot::MultiPolygon(polygons) => Geometry::MultiPolygon(polygons.clone()),
            GeometrySlot::GeometryCollection(collection) => {
                Geometry::GeometryCollection(collection.clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{line_string, point, polygon, Rect};

    #[test]
    fn polygon_is_widened_to_multipolygon() {
        let polygon = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 2.0),
            (x: 2.0, y: 2.0),
            (x: 2.0, y: 0.0),
        ];
        let slot = GeometrySlot::wrap(Geometry::Polygon(polygon)).unwrap();
        assert_eq!(slot.kind(), "MultiPolygon");
        assert_eq!(slot.as_multipolygon().unwrap().0.len(), 1);
    }

    #[test]
    fn line_string_is_widened_to_multilinestring() {
        let line = line_string![(x: 0.0, y: 0.0), (x: 1.0, y: 1.0)];
        let slot = GeometrySlot::wrap(Geometry::LineString(line)).unwrap();
        assert_eq!(slot.kind(), "MultiLineString");
    }

    #[test]
    fn multi_shapes_pass_through() {
        let slot = GeometrySlot::wrap(Geometry::Point(point!(x: 3.0, y: 4.0))).unwrap();
        assert_eq!(slot.kind(), "Point");
        assert_eq!(slot.centroid(), Some(point!(x: 3.0, y: 4.0)));
    }

    #[test]
    fn rect_has_no_storage_slot() {
        let rect = Rect::new((0.0, 0.0), (1.0, 1.0));
        assert!(GeometrySlot::wrap(Geometry::Rect(rect)).is_err());
    }
}
