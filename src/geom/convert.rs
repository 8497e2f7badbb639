use geo::{
    Coord, Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon,
};
use shapefile::{PolygonRing, Shape};

use crate::error::ProcessingError;

/// Geometry-kind label for a shape, as recorded on the owning datafile.
pub(crate) fn shape_kind_name(shape: &Shape) -> &'static str {
    match shape {
        Shape::NullShape => "Null",
        Shape::Point(_) | Shape::PointM(_) | Shape::PointZ(_) => "Point",
        Shape::Multipoint(_) | Shape::MultipointM(_) | Shape::MultipointZ(_) => "MultiPoint",
        Shape::Polyline(_) | Shape::PolylineM(_) | Shape::PolylineZ(_) => "LineString",
        Shape::Polygon(_) | Shape::PolygonM(_) | Shape::PolygonZ(_) => "Polygon",
        _ => "Unknown",
    }
}

/// Convert a shapefile record shape into a `geo` geometry, dropping any
/// measure/elevation values.
pub(crate) fn shape_to_geometry(shape: Shape) -> Result<Geometry<f64>, ProcessingError> {
    match shape {
        Shape::NullShape => Err(ProcessingError::BadGeometry("null shape in record".to_string())),
        Shape::Point(p) => Ok(Geometry::Point(Point::new(p.x, p.y))),
        Shape::PointM(p) => Ok(Geometry::Point(Point::new(p.x, p.y))),
        Shape::PointZ(p) => Ok(Geometry::Point(Point::new(p.x, p.y))),
        Shape::Multipoint(mp) => Ok(Geometry::MultiPoint(to_multipoint(mp.points(), |p| (p.x, p.y)))),
        Shape::MultipointM(mp) => Ok(Geometry::MultiPoint(to_multipoint(mp.points(), |p| (p.x, p.y)))),
        Shape::MultipointZ(mp) => Ok(Geometry::MultiPoint(to_multipoint(mp.points(), |p| (p.x, p.y)))),
        Shape::Polyline(pl) => Ok(Geometry::MultiLineString(to_multilinestring(pl.parts(), |p| (p.x, p.y)))),
        Shape::PolylineM(pl) => Ok(Geometry::MultiLineString(to_multilinestring(pl.parts(), |p| (p.x, p.y)))),
        Shape::PolylineZ(pl) => Ok(Geometry::MultiLineString(to_multilinestring(pl.parts(), |p| (p.x, p.y)))),
        Shape::Polygon(pg) => Ok(Geometry::MultiPolygon(to_multipolygon(pg.rings(), |p| (p.x, p.y)))),
        Shape::PolygonM(pg) => Ok(Geometry::MultiPolygon(to_multipolygon(pg.rings(), |p| (p.x, p.y)))),
        Shape::PolygonZ(pg) => Ok(Geometry::MultiPolygon(to_multipolygon(pg.rings(), |p| (p.x, p.y)))),
        _ => Err(ProcessingError::BadGeometry("unsupported shape type".to_string())),
    }
}

fn to_multipoint<P>(points: &[P], xy: impl Fn(&P) -> (f64, f64)) -> MultiPoint<f64> {
    MultiPoint(
        points
            .iter()
            .map(|p| {
                let (x, y) = xy(p);
                Point::new(x, y)
            })
            .collect(),
    )
}

fn to_multilinestring<P>(parts: &[Vec<P>], xy: impl Fn(&P) -> (f64, f64)) -> MultiLineString<f64> {
    MultiLineString(
        parts
            .iter()
            .map(|part| LineString(part.iter().map(|p| coord(xy(p))).collect()))
            .collect(),
    )
}

/// Group shapefile rings into polygons. Rings are stored exterior-first
/// with each exterior followed by its holes; exteriors wind clockwise
/// (negative signed area).
fn to_multipolygon<P>(rings: &[PolygonRing<P>], xy: impl Fn(&P) -> (f64, f64)) -> MultiPolygon<f64> {
    /// Ensure first and last coordinates match.
    fn ensure_closed(coords: &mut Vec<Coord<f64>>) {
        if !coords.is_empty() && coords[0] != coords[coords.len() - 1] {
            coords.push(coords[0]);
        }
    }

    /// Signed area of a ring (negative for clockwise).
    fn signed_area(coords: &[Coord<f64>]) -> f64 {
        let mut area = 0.0;
        for pair in coords.windows(2) {
            area += pair[0].x * pair[1].y - pair[1].x * pair[0].y;
        }
        area / 2.0
    }

    let mut polygons: Vec<Polygon<f64>> = Vec::new();
    let mut current_exterior: Option<LineString<f64>> = None;
    let mut current_holes: Vec<LineString<f64>> = Vec::new();

    for ring in rings {
        let mut coords: Vec<Coord<f64>> = ring.points().iter().map(|p| coord(xy(p))).collect();
        ensure_closed(&mut coords);
        let is_exterior = signed_area(&coords) < 0.0;
        let line = LineString(coords);

        if is_exterior {
            if let Some(exterior) = current_exterior.take() {
                polygons.push(Polygon::new(exterior, std::mem::take(&mut current_holes)));
            }
            current_exterior = Some(line);
        } else {
            current_holes.push(line);
        }
    }
    if let Some(exterior) = current_exterior {
        polygons.push(Polygon::new(exterior, current_holes));
    }

    MultiPolygon(polygons)
}

#[inline]
fn coord((x, y): (f64, f64)) -> Coord<f64> {
    Coord { x, y }
}
