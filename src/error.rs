use std::path::PathBuf;

use thiserror::Error;

use crate::types::DataFileId;

/// Failures raised by the ingestion pipeline.
///
/// Importer errors are appended to the owning datafile's event log before
/// they propagate, so the record keeps a human-readable explanation of what
/// went wrong. Per-row boundary-lookup misses are not errors; they are
/// collected in the import report instead.
#[derive(Debug, Error)]
pub enum ProcessingError {
    #[error("not a valid zip archive: {}", .0.display())]
    InvalidArchive(PathBuf),

    #[error("archive missing the following file types: {missing}")]
    IncompleteArchive { missing: String },

    #[error("invalid shapefile: {0}")]
    InvalidShapefile(String),

    #[error("unsupported coordinate reference system: {0}")]
    UnsupportedCrs(String),

    #[error("zip archive found: please unpack the zip and upload a csv with named fields")]
    ArchivedCsv,

    #[error("csv is missing required column {0:?}")]
    MissingColumn(&'static str),

    #[error("file does not exist: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("unsupported file type: {0:?}")]
    UnsupportedFileType(String),

    #[error("{0} import is not implemented")]
    NotImplemented(&'static str),

    #[error("file is too large: {size} bytes (limit is {limit})")]
    FileTooLarge { size: u64, limit: u64 },

    #[error("default zoom level must be a number between 1 and 20, got {0}")]
    InvalidZoom(u8),

    #[error("no datafile with id {0}")]
    UnknownDataFile(DataFileId),

    #[error("boundary lookup failed: {0}")]
    Lookup(String),

    #[error("malformed geometry: {0}")]
    BadGeometry(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("csv parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
