use std::fs;
use std::path::Path;

use shapefile::dbase::{self, FieldValue};
use tracing::{debug, info};

use crate::error::ProcessingError;
use crate::geom::{shape_kind_name, shape_to_geometry, CrsTransform, GeometrySlot};
use crate::ingest::report::ImportReport;
use crate::store::{Attribute, Feature, ProcessingEvent, Stage, Store};
use crate::types::DataFileId;

/// Field schema copied from the .dbf table header.
struct FieldSpec {
    name: String,
    attr_type: String,
    width: Option<u8>,
}

/// Reads a resolved `.shp` bundle into feature and attribute records,
/// reprojecting every geometry into the canonical reference system.
pub struct ShapefileImporter;

impl ShapefileImporter {
    pub fn import(
        store: &mut dyn Store,
        datafile_id: DataFileId,
        shp_path: &Path,
    ) -> Result<ImportReport, ProcessingError> {
        let wkt = fs::read_to_string(shp_path.with_extension("prj")).map_err(|_| {
            ProcessingError::InvalidShapefile(format!(
                "no .prj beside {}",
                shp_path.display()
            ))
        })?;
        let wkt = wkt.trim().to_string();

        let mut reader = shapefile::Reader::from_path(shp_path)
            .map_err(|err| ProcessingError::InvalidShapefile(err.to_string()))?;
        let table = dbase::Reader::from_path(shp_path.with_extension("dbf"))
            .map_err(|err| ProcessingError::InvalidShapefile(err.to_string()))?;
        let schema: Vec<FieldSpec> = table
            .fields()
            .iter()
            .map(|field| FieldSpec {
                name: field.name().to_string(),
                attr_type: format!("{:?}", field.field_type()),
                width: Some(field.length()),
            })
            .collect();

        let records: Vec<_> = reader
            .iter_shapes_and_records()
            .collect::<Result<_, _>>()
            .map_err(|err| {
                ProcessingError::InvalidShapefile(format!(
                    "could not read shapes and records: {err}"
                ))
            })?;
        debug!(records = records.len(), fields = schema.len(), "opened shapefile layer");

        let transform = CrsTransform::from_wkt(&wkt)?;

        {
            let datafile = store
                .datafile_mut(datafile_id)
                .ok_or(ProcessingError::UnknownDataFile(datafile_id))?;
            datafile.srs_wkt = Some(wkt);
            datafile.geom_type = records
                .first()
                .map(|(shape, _)| shape_kind_name(shape).to_string());
            datafile.record(ProcessingEvent::progress(
                Stage::Import,
                "Processing attributes and features.",
            ));
        }

        let mut report = ImportReport::default();
        for (shape, record) in records {
            let geometry = transform.apply(shape_to_geometry(shape)?);
            let slot = GeometrySlot::wrap(geometry)?;
            let feature_id = store.insert_feature(Feature::new(datafile_id, "", "", slot));

            for spec in &schema {
                let value = match record.get(&spec.name) {
                    Some(value) => field_value_to_string(value),
                    None => "None".to_string(),
                };
                store.insert_attribute(Attribute::new(
                    feature_id,
                    spec.name.as_str(),
                    spec.attr_type.as_str(),
                    spec.width,
                    None,
                    value,
                ));
            }
            report.features += 1;
        }

        info!(datafile = %datafile_id, features = report.features, "shapefile import finished");
        Ok(report)
    }
}

/// String form of a record value; absent or null values become the
/// literal "None".
fn field_value_to_string(value: &FieldValue) -> String {
    match value {
        FieldValue::Character(Some(text)) => text.clone(),
        FieldValue::Character(None) => "None".to_string(),
        FieldValue::Numeric(Some(number)) => number.to_string(),
        FieldValue::Numeric(None) => "None".to_string(),
        FieldValue::Logical(Some(flag)) => flag.to_string(),
        FieldValue::Logical(None) => "None".to_string(),
        FieldValue::Float(Some(number)) => number.to_string(),
        FieldValue::Float(None) => "None".to_string(),
        FieldValue::Integer(number) => number.to_string(),
        FieldValue::Double(number) => number.to_string(),
        FieldValue::Currency(number) => number.to_string(),
        FieldValue::Memo(text) => text.clone(),
        other => format!("{other:?}"),
    }
}
