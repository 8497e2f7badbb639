use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use geo::Point;
use serde::Serialize;

use crate::error::ProcessingError;
use crate::geom::GeometrySlot;
use crate::store::events::ProcessingEvent;
use crate::types::{AttributeId, CharacterEncoding, DataFileId, FeatureId, FileKind};

/// Where a datafile sits in its processing lifecycle.
///
/// `Processed`/`ProcessedEmpty` mean the pipeline ran to completion;
/// `Failed` means it raised. Keeping these apart makes a partially
/// populated upload distinguishable from a finished one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    Created,
    Processing,
    Processed,
    ProcessedEmpty,
    Failed,
}

/// One uploaded geographic data file, whether csv, shapefile, kml, or
/// anything else.
#[derive(Debug, Clone)]
pub struct DataFile {
    pub id: DataFileId,
    pub name: String,
    pub kind: FileKind,
    pub stored_path: PathBuf,
    pub first_uploaded: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub state: ProcessState,
    pub events: Vec<ProcessingEvent>,
    pub encoding: CharacterEncoding,
    pub source_url: Option<String>,
    pub description: Option<String>,

    // Geographic parameters filled in by the importers.
    pub srs_wkt: Option<String>,
    pub geom_type: Option<String>,
    pub default_zoom: Option<u8>,
    /// Stored in (latitude, longitude) coordinate order.
    pub default_center: Option<Point<f64>>,
}

impl DataFile {
    pub fn new(name: impl Into<String>, kind: FileKind, stored_path: impl Into<PathBuf>) -> Self {
        let now = Utc::now();
        Self {
            id: DataFileId(0),
            name: name.into(),
            kind,
            stored_path: stored_path.into(),
            first_uploaded: now,
            updated: now,
            state: ProcessState::Created,
            events: Vec::new(),
            encoding: CharacterEncoding::default(),
            source_url: None,
            description: None,
            srs_wkt: None,
            geom_type: None,
            default_zoom: None,
            default_center: None,
        }
    }

    /// Append an event to the processing log and touch the update time.
    pub fn record(&mut self, event: ProcessingEvent) {
        self.updated = event.at;
        self.events.push(event);
    }

    /// Latest human-readable status, derived from the event log.
    pub fn process_note(&self) -> Option<&str> {
        self.events.last().map(|event| event.note.as_str())
    }

    /// Compatibility projection: did the pipeline run to completion?
    pub fn processed(&self) -> bool {
        matches!(self.state, ProcessState::Processed | ProcessState::ProcessedEmpty)
    }

    /// The name of this data file is whatever the uploader typed in, which
    /// is not necessarily its filename.
    pub fn filename(&self) -> &str {
        self.stored_path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("")
    }

    /// 1 is global, 20 is extremely close (about one building).
    pub fn set_default_zoom(&mut self, zoom: u8) -> Result<(), ProcessingError> {
        if !(1..=20).contains(&zoom) {
            return Err(ProcessingError::InvalidZoom(zoom));
        }
        self.default_zoom = Some(zoom);
        Ok(())
    }
}

/// Generic geographic feature: used when parsing a file whose geometric
/// types are not known up front, so it works for any upload.
#[derive(Debug, Clone)]
pub struct Feature {
    pub id: FeatureId,
    pub datafile: DataFileId,
    pub reference: String,
    pub federal_geo_id: String,
    pub geometry: GeometrySlot,
}

impl Feature {
    pub fn new(
        datafile: DataFileId,
        reference: impl Into<String>,
        federal_geo_id: impl Into<String>,
        geometry: GeometrySlot,
    ) -> Self {
        Self {
            id: FeatureId(0),
            datafile,
            reference: reference.into(),
            federal_geo_id: federal_geo_id.into(),
            geometry,
        }
    }
}

/// One generic value that appeared in an uploaded file, bound to a feature.
/// This is where most of the interesting data lives, stored as text because
/// it could really be anything.
#[derive(Debug, Clone)]
pub struct Attribute {
    pub id: AttributeId,
    pub feature: FeatureId,
    pub field_name: String,
    /// Declared type label; empty for csv-derived attributes.
    pub attr_type: String,
    pub width: Option<u8>,
    pub precision: Option<u8>,
    pub field_value: String,
}

impl Attribute {
    pub fn new(
        feature: FeatureId,
        field_name: impl Into<String>,
        attr_type: impl Into<String>,
        width: Option<u8>,
        precision: Option<u8>,
        field_value: impl Into<String>,
    ) -> Self {
        Self {
            id: AttributeId(0),
            feature,
            field_name: field_name.into(),
            attr_type: attr_type.into(),
            width,
            precision,
            field_value: field_value.into(),
        }
    }
}

/// Reject uploads over the configured size cap before any processing runs.
pub fn validate_upload(path: &Path, limit: u64) -> Result<(), ProcessingError> {
    let size = fs::metadata(path)
        .map_err(|_| ProcessingError::MissingFile(path.to_path_buf()))?
        .len();
    if size > limit {
        return Err(ProcessingError::FileTooLarge { size, limit });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::events::Stage;

    fn sample() -> DataFile {
        DataFile::new("roads", FileKind::ShapefileZip, "/tmp/roads.zip")
    }

    #[test]
    fn zoom_bounds_are_enforced() {
        let mut datafile = sample();
        assert!(datafile.set_default_zoom(0).is_err());
        assert!(datafile.set_default_zoom(21).is_err());
        assert!(datafile.set_default_zoom(1).is_ok());
        assert!(datafile.set_default_zoom(20).is_ok());
        assert_eq!(datafile.default_zoom, Some(20));
    }

    #[test]
    fn process_note_tracks_latest_event() {
        let mut datafile = sample();
        assert_eq!(datafile.process_note(), None);
        datafile.record(ProcessingEvent::progress(Stage::Received, "Initiated datafile processing."));
        datafile.record(ProcessingEvent::progress(Stage::Import, "Processing attributes and features."));
        assert_eq!(datafile.process_note(), Some("Processing attributes and features."));
        assert_eq!(datafile.events.len(), 2);
    }

    #[test]
    fn failed_state_is_not_processed() {
        let mut datafile = sample();
        datafile.state = ProcessState::Failed;
        assert!(!datafile.processed());
        datafile.state = ProcessState::ProcessedEmpty;
        assert!(datafile.processed());
    }

    #[test]
    fn filename_is_the_stored_basename() {
        let datafile = DataFile::new("pretty name", FileKind::Kml, "/uploads/2026/08/actual.kml");
        assert_eq!(datafile.filename(), "actual.kml");
    }
}
