use std::path::Path;

use serde::Serialize;
use tracing::{info, warn};

use crate::error::ProcessingError;
use crate::geom::average_center;
use crate::ingest::acs::AcsImporter;
use crate::ingest::archive;
use crate::ingest::boundary::BoundaryLookup;
use crate::ingest::report::{ImportReport, SkippedRow};
use crate::ingest::shapefile::ShapefileImporter;
use crate::store::{ProcessState, ProcessingEvent, Stage, Store};
use crate::types::{DataFileId, FileKind};

/// Outcome of one full pipeline run over a datafile.
#[derive(Debug, Clone, Serialize)]
pub struct ProcessSummary {
    pub features: usize,
    pub skipped: Vec<SkippedRow>,
    /// (latitude, longitude), matching the stored point's coordinate order.
    pub default_center: Option<(f64, f64)>,
}

/// Run the importer matching a datafile's declared type, then compute its
/// default map center and move the record to a terminal state.
///
/// On importer failure the error is appended to the record's event log and
/// the state set to `Failed` before the error propagates, so an operator
/// can tell a partial import from a completed one.
pub fn process_datafile(
    store: &mut dyn Store,
    boundaries: &dyn BoundaryLookup,
    datafile_id: DataFileId,
) -> Result<ProcessSummary, ProcessingError> {
    let datafile = store
        .datafile_mut(datafile_id)
        .ok_or(ProcessingError::UnknownDataFile(datafile_id))?;
    let kind = datafile.kind;
    let stored_path = datafile.stored_path.clone();
    datafile.state = ProcessState::Processing;
    datafile.record(ProcessingEvent::progress(
        Stage::Received,
        "Initiated datafile processing.",
    ));
    info!(datafile = %datafile_id, kind = kind.as_code(), "processing datafile");

    match run_importer(store, boundaries, datafile_id, kind, &stored_path) {
        Ok(report) => finalize(store, datafile_id, report),
        Err(err) => {
            if let Some(datafile) = store.datafile_mut(datafile_id) {
                datafile.record(ProcessingEvent::error(Stage::Import, err.to_string()));
                datafile.state = ProcessState::Failed;
            }
            warn!(datafile = %datafile_id, error = %err, "import failed");
            Err(err)
        }
    }
}

fn run_importer(
    store: &mut dyn Store,
    boundaries: &dyn BoundaryLookup,
    datafile_id: DataFileId,
    kind: FileKind,
    stored_path: &Path,
) -> Result<ImportReport, ProcessingError> {
    match kind {
        FileKind::ShapefileZip => {
            let scratch = archive::extract_shapefile_zip(stored_path)?;
            if let Some(datafile) = store.datafile_mut(datafile_id) {
                datafile.record(ProcessingEvent::progress(
                    Stage::Extract,
                    "Shapefile found in zip. Processing shapefile.",
                ));
            }
            ShapefileImporter::import(store, datafile_id, scratch.shp_path())
            // scratch drops here, removing the extraction dir whether the
            // import succeeded or not
        }
        FileKind::Shapefile => ShapefileImporter::import(store, datafile_id, stored_path),
        FileKind::Acs(level) => {
            AcsImporter::new(level, boundaries).import(store, datafile_id, stored_path)
        }
        FileKind::Kml => Err(ProcessingError::NotImplemented("kml")),
        FileKind::Kmz => Err(ProcessingError::NotImplemented("kmz")),
    }
}

fn finalize(
    store: &mut dyn Store,
    datafile_id: DataFileId,
    report: ImportReport,
) -> Result<ProcessSummary, ProcessingError> {
    let (count, center) = {
        let features = store.features_of(datafile_id);
        (features.len(), average_center(&features))
    };

    let datafile = store
        .datafile_mut(datafile_id)
        .ok_or(ProcessingError::UnknownDataFile(datafile_id))?;

    if count > 0 {
        if let Some(point) = center {
            datafile.default_center = Some(point);
        }
        datafile.record(ProcessingEvent::progress(
            Stage::Center,
            "Center point saved. Processing complete.",
        ));
        datafile.state = ProcessState::Processed;
    } else {
        datafile.record(ProcessingEvent::progress(
            Stage::Finalize,
            "No features saved. Center could not be processed.",
        ));
        datafile.state = ProcessState::ProcessedEmpty;
    }

    info!(datafile = %datafile_id, features = count, "processing complete");
    Ok(ProcessSummary {
        features: report.features,
        skipped: report.skipped,
        default_center: datafile.default_center.map(|point| (point.x(), point.y())),
    })
}
