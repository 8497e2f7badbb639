use geo::{Coord, Geometry, MapCoords};
use proj4rs::{proj::Proj as Proj4, transform::transform};
use regex::Regex;

use crate::error::ProcessingError;

const WGS84_GEOG: &str = "+proj=longlat +datum=WGS84 +no_defs +type=crs";

/// Reference datums we can resolve from a `.prj` without a full WKT parser.
const REFERENCE_DATUMS: [&str; 3] = ["NAD27", "NAD83", "WGS84"];

/// Transform from a shapefile's native reference system into geographic
/// WGS84 (EPSG:4326), the canonical storage system.
///
/// The native system is resolved by sniffing the sidecar WKT for one of
/// the common reference datums and an optional UTM zone; anything else is
/// rejected rather than guessed.
pub(crate) enum CrsTransform {
    /// Source is already geographic WGS84.
    Identity,
    Transform {
        from: Proj4,
        to: Proj4,
        src_geographic: bool,
    },
}

impl CrsTransform {
    pub(crate) fn from_wkt(wkt: &str) -> Result<Self, ProcessingError> {
        let (proj_string, src_geographic) = proj4_from_wkt(wkt)?;
        if proj_string == WGS84_GEOG {
            return Ok(CrsTransform::Identity);
        }

        let from = Proj4::from_proj_string(&proj_string)
            .map_err(|err| ProcessingError::UnsupportedCrs(format!("{proj_string}: {err}")))?;
        let to = Proj4::from_proj_string(WGS84_GEOG)
            .map_err(|err| ProcessingError::UnsupportedCrs(format!("{WGS84_GEOG}: {err}")))?;

        Ok(CrsTransform::Transform { from, to, src_geographic })
    }

    /// Reproject a geometry into EPSG:4326, degrees out.
    pub(crate) fn apply(&self, geometry: Geometry<f64>) -> Geometry<f64> {
        match self {
            CrsTransform::Identity => geometry,
            CrsTransform::Transform { from, to, src_geographic } => {
                // proj4rs wants radians for geographic systems on either end.
                geometry.map_coords(|coord: Coord<f64>| {
                    let mut point = if *src_geographic {
                        (coord.x.to_radians(), coord.y.to_radians(), 0.0)
                    } else {
                        (coord.x, coord.y, 0.0)
                    };
                    transform(from, to, &mut point).expect("CRS transform failed");
                    Coord { x: point.0.to_degrees(), y: point.1.to_degrees() }
                })
            }
        }
    }
}

/// Map a `.prj` WKT to a PROJ.4 string by datum year, the same way the
/// classic reference datums are usually told apart. Returns the string and
/// whether the source system is geographic (degrees) or projected.
fn proj4_from_wkt(wkt: &str) -> Result<(String, bool), ProcessingError> {
    let datum = find_reference_datum(wkt)
        .ok_or_else(|| ProcessingError::UnsupportedCrs(summarize(wkt)))?;

    if wkt.contains("PROJCS") {
        let utm = Regex::new(r#"(?i)UTM[ _]?zone[ _]?(\d{1,2})\s*([NS])?"#)
            .expect("utm regex")
            .captures(wkt)
            .ok_or_else(|| ProcessingError::UnsupportedCrs(summarize(wkt)))?;
        let zone: u32 = utm[1].parse().map_err(|_| ProcessingError::UnsupportedCrs(summarize(wkt)))?;
        if !(1..=60).contains(&zone) {
            return Err(ProcessingError::UnsupportedCrs(summarize(wkt)));
        }
        let south = matches!(utm.get(2).map(|m| m.as_str()), Some("S") | Some("s"));

        // NAD UTM is only standard in the north; fall back to WGS84 south.
        let datum = if south { "WGS84" } else { datum };
        let south = if south { " +south" } else { "" };
        return Ok((
            format!("+proj=utm +zone={zone}{south} +datum={datum} +units=m +no_defs +type=crs"),
            false,
        ));
    }

    Ok((format!("+proj=longlat +datum={datum} +no_defs +type=crs"), true))
}

/// Find the reference datum named in the WKT by matching the datum year
/// (27/83/84), which survives the many spellings .prj files use.
fn find_reference_datum(wkt: &str) -> Option<&'static str> {
    let datum_clause = Regex::new(r#"DATUM\["([^"]+)""#)
        .expect("datum regex")
        .captures(wkt)
        .map(|captures| captures[1].to_string())?;

    REFERENCE_DATUMS
        .iter()
        .copied()
        .find(|datum| datum_clause.contains(&datum[datum.len() - 2..]))
}

fn summarize(wkt: &str) -> String {
    wkt.chars().take(120).collect()
}
