use std::fs;
use std::time::Duration;

use anyhow::{Context, Result};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{Cli, IngestArgs};
use crate::config::PipelineConfig;
use crate::geom::slot_to_geojson;
use crate::ingest::{process_datafile, HttpBoundaryClient};
use crate::store::{validate_upload, DataFile, MemStore, Store};
use crate::types::{DataFileId, FileKind};

pub fn run(cli: &Cli, args: &IngestArgs) -> Result<()> {
    let kind = FileKind::from_code(&args.kind)?;

    let mut config = PipelineConfig::default();
    if let Some(url) = &args.boundary_url {
        config.boundary.base_url = url.clone();
    }
    if let Some(secs) = args.timeout_secs {
        config.boundary.timeout = Duration::from_secs(secs);
    }

    validate_upload(&args.file, config.max_upload_bytes)?;

    let name = args.name.clone().unwrap_or_else(|| {
        args.file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string())
    });

    let boundaries = HttpBoundaryClient::new(&config.boundary)?;
    let mut store = MemStore::new();
    let datafile_id = store.insert_datafile(DataFile::new(name, kind, args.file.clone()));

    let summary = process_datafile(&mut store, &boundaries, datafile_id)?;

    println!(
        "{} feature(s) imported, {} row(s) skipped",
        summary.features,
        summary.skipped.len()
    );
    if let Some((lat, lon)) = summary.default_center {
        println!("default center: {lat:.6}, {lon:.6}");
    }
    if cli.verbose > 0 {
        for skip in &summary.skipped {
            println!("  line {}: {} ({})", skip.line, skip.geo_id, skip.reason);
        }
    }

    if let Some(out) = &args.out {
        let collection = feature_collection(&store, datafile_id);
        fs::write(out, serde_json::to_string_pretty(&collection)?)
            .with_context(|| format!("write {}", out.display()))?;
        info!(path = %out.display(), "wrote feature collection");
    }
    if let Some(report_path) = &args.report {
        fs::write(report_path, serde_json::to_string_pretty(&summary)?)
            .with_context(|| format!("write {}", report_path.display()))?;
    }

    Ok(())
}

/// Export a datafile's features as a GeoJSON FeatureCollection, carrying
/// each feature's attributes as properties.
fn feature_collection(store: &dyn Store, datafile_id: DataFileId) -> Value {
    let features: Vec<Value> = store
        .features_of(datafile_id)
        .into_iter()
        .map(|feature| {
            let mut properties = serde_json::Map::new();
            if !feature.reference.is_empty() {
                properties.insert("reference".to_string(), json!(feature.reference));
            }
            if !feature.federal_geo_id.is_empty() {
                properties.insert("geo_id".to_string(), json!(feature.federal_geo_id));
            }
            for attribute in store.attributes_of(feature.id) {
                properties.insert(attribute.field_name.clone(), json!(attribute.field_value));
            }
            json!({
                "type": "Feature",
                "geometry": slot_to_geojson(&feature.geometry),
                "properties": properties,
            })
        })
        .collect();

    json!({
        "type": "FeatureCollection",
        "features": features,
    })
}
