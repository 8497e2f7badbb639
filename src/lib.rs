#![doc = "Geographic data file ingestion: shapefiles and census tables to WGS84 features"]
pub mod cli;
pub mod commands;
mod config;
mod error;
mod geom;
mod ingest;
mod store;
mod types;

#[doc(inline)]
pub use config::{BoundaryServiceConfig, PipelineConfig, DEFAULT_BOUNDARY_BASE_URL, MAX_UPLOAD_BYTES};

#[doc(inline)]
pub use error::ProcessingError;

#[doc(inline)]
pub use geom::{average_center, geometry_from_geojson, slot_to_geojson, GeometrySlot};

#[doc(inline)]
pub use ingest::{
    extract_shapefile_zip, process_datafile, AcsImporter, BoundaryLookup, HttpBoundaryClient,
    ImportReport, ProcessSummary, ScratchShapefile, ShapefileImporter, SkippedRow,
};

#[doc(inline)]
pub use store::{
    validate_upload, Attribute, DataFile, Feature, MemStore, ProcessState, ProcessingEvent, Stage,
    Store,
};

#[doc(inline)]
pub use types::{AttributeId, CharacterEncoding, DataFileId, FeatureId, FileKind, GeoLevel};
