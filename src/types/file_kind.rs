use crate::error::ProcessingError;
use crate::types::GeoLevel;

/// Declared type of an uploaded datafile, as selected at upload time.
///
/// This is a closed set: the dispatch router matches it exhaustively, and a
/// code with no registered handler is rejected at parse time instead of
/// silently dropping the upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// Bare `.shp` with its companions already beside it.
    Shapefile,
    /// Zipped shapefile bundle (.shp/.shx/.dbf/.prj).
    ShapefileZip,
    Kml,
    Kmz,
    /// American Community Survey table, keyed to a census geography level.
    Acs(GeoLevel),
}

impl FileKind {
    pub fn from_code(code: &str) -> Result<Self, ProcessingError> {
        match code {
            "shapefile" => Ok(FileKind::Shapefile),
            "shapefile_zip" => Ok(FileKind::ShapefileZip),
            "kml" => Ok(FileKind::Kml),
            "kmz" => Ok(FileKind::Kmz),
            other => GeoLevel::from_code(other)
                .map(FileKind::Acs)
                .ok_or_else(|| ProcessingError::UnsupportedFileType(other.to_string())),
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            FileKind::Shapefile => "shapefile",
            FileKind::ShapefileZip => "shapefile_zip",
            FileKind::Kml => "kml",
            FileKind::Kmz => "kmz",
            FileKind::Acs(level) => level.as_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn acs_codes_parse_to_their_level() {
        assert_eq!(
            FileKind::from_code("counties").unwrap(),
            FileKind::Acs(GeoLevel::Counties)
        );
        assert_eq!(
            FileKind::from_code("county-subdivisions").unwrap(),
            FileKind::Acs(GeoLevel::CountySubdivisions)
        );
    }

    #[test]
    fn shapefile_codes_parse() {
        assert_eq!(FileKind::from_code("shapefile_zip").unwrap(), FileKind::ShapefileZip);
        assert_eq!(FileKind::from_code("kmz").unwrap(), FileKind::Kmz);
    }

    #[test]
    fn unknown_code_fails_loudly() {
        assert!(matches!(
            FileKind::from_code("geodatabase"),
            Err(ProcessingError::UnsupportedFileType(_))
        ));
    }
}
