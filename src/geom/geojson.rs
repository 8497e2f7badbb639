use geo::{
    Coord, Geometry, GeometryCollection, LineString, MultiLineString, MultiPoint, MultiPolygon,
    Point, Polygon,
};
use serde_json::{json, Value};

use crate::error::ProcessingError;
use crate::geom::GeometrySlot;

/// Parse a GeoJSON geometry object into a `geo` geometry.
pub fn geometry_from_geojson(value: &Value) -> Result<Geometry<f64>, ProcessingError> {
    let kind = value
        .get("type")
        .and_then(Value::as_str)
        .ok_or_else(|| bad("geometry object has no type"))?;

    if kind == "GeometryCollection" {
        let members = value
            .get("geometries")
            .and_then(Value::as_array)
            .ok_or_else(|| bad("GeometryCollection has no geometries array"))?;
        let geometries = members
            .iter()
            .map(geometry_from_geojson)
            .collect::<Result<Vec<_>, _>>()?;
        return Ok(Geometry::GeometryCollection(GeometryCollection(geometries)));
    }

    let coordinates = value
        .get("coordinates")
        .ok_or_else(|| bad("geometry object has no coordinates"))?;

    match kind {
        "Point" => Ok(Geometry::Point(Point::from(position(coordinates)?))),
        "MultiPoint" => Ok(Geometry::MultiPoint(MultiPoint(
            each(coordinates)?
                .iter()
                .map(|p| position(p).map(Point::from))
                .collect::<Result<_, _>>()?,
        ))),
        "LineString" => Ok(Geometry::LineString(line_string(coordinates)?)),
        "MultiLineString" => Ok(Geometry::MultiLineString(MultiLineString(
            each(coordinates)?
                .iter()
                .map(line_string)
                .collect::<Result<_, _>>()?,
        ))),
        "Polygon" => Ok(Geometry::Polygon(polygon(coordinates)?)),
        "MultiPolygon" => Ok(Geometry::MultiPolygon(MultiPolygon(
            each(coordinates)?
                .iter()
                .map(polygon)
                .collect::<Result<_, _>>()?,
        ))),
        other => Err(bad(format!("unsupported geometry type {other:?}"))),
    }
}

/// Encode a stored geometry slot as a GeoJSON geometry object.
pub fn slot_to_geojson(slot: &GeometrySlot) -> Value {
    match slot {
        GeometrySlot::Point(point) => json!({
            "type": "Point",
            "coordinates": coordinates_of_point(point),
        }),
        GeometrySlot::MultiPoint(points) => json!({
            "type": "MultiPoint",
            "coordinates": points.0.iter().map(coordinates_of_point).collect::<Vec<_>>(),
        }),
        GeometrySlot::MultiLineString(lines) => json!({
            "type": "MultiLineString",
            "coordinates": lines.0.iter().map(coordinates_of_line).collect::<Vec<_>>(),
        }),
        GeometrySlot::MultiPolygon(polygons) => json!({
            "type": "MultiPolygon",
            "coordinates": polygons.0.iter().map(coordinates_of_polygon).collect::<Vec<_>>(),
        }),
        GeometrySlot::GeometryCollection(collection) => json!({
            "type": "GeometryCollection",
            "geometries": collection.0
                .iter()
                .filter_map(|geometry| GeometrySlot::wrap(geometry.clone()).ok())
                .map(|member| slot_to_geojson(&member))
                .collect::<Vec<_>>(),
        }),
    }
}

fn bad(message: impl Into<String>) -> ProcessingError {
    ProcessingError::BadGeometry(message.into())
}

fn each(value: &Value) -> Result<&Vec<Value>, ProcessingError> {
    value.as_array().ok_or_else(|| bad("expected a coordinate array"))
}

fn position(value: &Value) -> Result<Coord<f64>, ProcessingError> {
    let pair = each(value)?;
    if pair.len() < 2 {
        return Err(bad("position needs at least two numbers"));
    }
    let x = pair[0].as_f64().ok_or_else(|| bad("non-numeric coordinate"))?;
    let y = pair[1].as_f64().ok_or_else(|| bad("non-numeric coordinate"))?;
    Ok(Coord { x, y })
}

fn line_string(value: &Value) -> Result<LineString<f64>, ProcessingError> {
    Ok(LineString(
        each(value)?.iter().map(position).collect::<Result<_, _>>()?,
    ))
}

fn polygon(value: &Value) -> Result<Polygon<f64>, ProcessingError> {
    let rings = each(value)?;
    let mut rings = rings.iter().map(line_string);
    let exterior = rings
        .next()
        .ok_or_else(|| bad("polygon has no rings"))??;
    let interiors = rings.collect::<Result<Vec<_>, _>>()?;
    Ok(Polygon::new(exterior, interiors))
}

fn coordinates_of_point(point: &Point<f64>) -> Vec<f64> {
    vec![point.x(), point.y()]
}

fn coordinates_of_line(line: &LineString<f64>) -> Vec<Vec<f64>> {
    line.coords().map(|c| vec![c.x, c.y]).collect()
}

fn coordinates_of_polygon(polygon: &Polygon<f64>) -> Vec<Vec<Vec<f64>>> {
    let mut rings = vec![coordinates_of_line(polygon.exterior())];
    rings.extend(polygon.interiors().iter().map(coordinates_of_line));
    rings
}
