use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info};

use crate::error::ProcessingError;
use crate::geom::GeometrySlot;
use crate::ingest::boundary::BoundaryLookup;
use crate::ingest::report::{ImportReport, SkippedRow};
use crate::store::{Attribute, Feature, Store};
use crate::types::{DataFileId, GeoLevel};

/// Column carrying the federal geo-id in ACS exports.
const GEO_ID_COLUMN: &str = "Id2";

enum Resolved {
    Geometry(GeometrySlot),
    Miss(String),
}

/// Reads an American Community Survey table, resolving each row's geo-id
/// to a boundary and persisting one feature plus one attribute per column.
pub struct AcsImporter<'a> {
    level: GeoLevel,
    boundaries: &'a dyn BoundaryLookup,
}

impl<'a> AcsImporter<'a> {
    pub fn new(level: GeoLevel, boundaries: &'a dyn BoundaryLookup) -> Self {
        Self { level, boundaries }
    }

    pub fn import(
        &self,
        store: &mut dyn Store,
        datafile_id: DataFileId,
        path: &Path,
    ) -> Result<ImportReport, ProcessingError> {
        match path.extension().and_then(|e| e.to_str()).map(|e| e.to_ascii_lowercase()) {
            Some(extension) if extension == "zip" => return Err(ProcessingError::ArchivedCsv),
            Some(extension) if extension == "csv" => {}
            other => {
                return Err(ProcessingError::UnsupportedFileType(
                    other.unwrap_or_else(|| "(no extension)".to_string()),
                ))
            }
        }
        if !path.exists() {
            return Err(ProcessingError::MissingFile(path.to_path_buf()));
        }

        let mut lines = BufReader::new(File::open(path)?);
        // ACS exports lead with a row of numeric column ids; toss it and
        // use the named header row that follows. If results look weird,
        // check that the uploaded file has field names.
        let mut banner = String::new();
        lines.read_line(&mut banner)?;

        let mut csv_reader = csv::ReaderBuilder::new().has_headers(true).from_reader(lines);
        let headers = csv_reader.headers()?.clone();
        let geo_id_column = headers
            .iter()
            .position(|header| header == GEO_ID_COLUMN)
            .ok_or(ProcessingError::MissingColumn(GEO_ID_COLUMN))?;

        let reference = self.level.reference_label();
        let mut report = ImportReport::default();

        for (row_index, row) in csv_reader.records().enumerate() {
            let row = row?;
            let geo_id = row.get(geo_id_column).unwrap_or("").to_string();
            // Physical line number: banner and header rows precede the data.
            let line = row_index as u64 + 3;

            let slot = match self.resolve_boundary(&*store, &reference, &geo_id)? {
                Resolved::Geometry(slot) => slot,
                Resolved::Miss(reason) => {
                    debug!(%geo_id, %reason, "skipping row");
                    report.skipped.push(SkippedRow { line, geo_id, reason });
                    continue;
                }
            };

            let feature_id =
                store.insert_feature(Feature::new(datafile_id, reference.clone(), geo_id, slot));
            for (name, value) in headers.iter().zip(row.iter()) {
                store.insert_attribute(Attribute::new(feature_id, name, "", None, None, value));
            }
            report.features += 1;
        }

        info!(
            datafile = %datafile_id,
            features = report.features,
            skipped = report.skipped.len(),
            "acs import finished"
        );
        Ok(report)
    }

    /// Reuse a boundary already stored for this (reference, geo-id) pair
    /// before going to the remote service. Reused geometry is copied by
    /// value, never shared.
    fn resolve_boundary(
        &self,
        store: &dyn Store,
        reference: &str,
        geo_id: &str,
    ) -> Result<Resolved, ProcessingError> {
        if let Some(existing) = store.find_boundary(reference, geo_id) {
            if let Some(polygons) = existing.geometry.as_multipolygon() {
                return Ok(Resolved::Geometry(GeometrySlot::MultiPolygon(polygons.clone())));
            }
        }

        match self.boundaries.fetch(self.level, geo_id)? {
            None => Ok(Resolved::Miss("no boundary available".to_string())),
            Some(geometry) => match GeometrySlot::wrap(geometry)? {
                slot @ GeometrySlot::MultiPolygon(_) => Ok(Resolved::Geometry(slot)),
                other => Ok(Resolved::Miss(format!(
                    "boundary is not polygonal ({})",
                    other.kind()
                ))),
            },
        }
    }
}
