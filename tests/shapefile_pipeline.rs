mod common;

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use common::FakeBoundaries;
use mapfiles::{
    process_datafile, DataFile, FileKind, MemStore, ProcessState, ProcessingError, Store,
};
use shapefile::dbase::{FieldValue, Record, TableWriterBuilder};
use shapefile::{Point, Polygon, PolygonRing};
use zip::write::SimpleFileOptions;

const WGS84_WKT: &str = r#"GEOGCS["GCS_WGS_1984",DATUM["D_WGS_1984",SPHEROID["WGS_1984",6378137.0,298.257223563]],PRIMEM["Greenwich",0.0],UNIT["Degree",0.0174532925199433]]"#;

/// Clockwise square ring with its corner at (x, y).
fn square_ring(x: f64, y: f64, side: f64) -> Vec<Point> {
    vec![
        Point { x, y },
        Point { x, y: y + side },
        Point { x: x + side, y: y + side },
        Point { x: x + side, y },
        Point { x, y },
    ]
}

/// Write a two-record polygon shapefile (with .shx/.dbf/.prj) into `dir`.
fn write_fixture_shapefile(dir: &Path) -> PathBuf {
    let shp_path = dir.join("zones.shp");
    let table = TableWriterBuilder::new()
        .add_character_field("NAME".try_into().unwrap(), 20)
        .add_numeric_field("POP".try_into().unwrap(), 10, 0);
    let mut writer = shapefile::Writer::from_path(&shp_path, table).unwrap();

    let zones = [
        (square_ring(0.0, 0.0, 4.0), "Alpha", 1200.0),
        (square_ring(10.0, 10.0, 2.0), "Beta", 3400.0),
    ];
    for (ring, name, pop) in zones {
        let shape = Polygon::with_rings(vec![PolygonRing::Outer(ring)]);
        let mut record = Record::default();
        record.insert("NAME".to_string(), FieldValue::Character(Some(name.to_string())));
        record.insert("POP".to_string(), FieldValue::Numeric(Some(pop)));
        writer.write_shape_and_record(&shape, &record).unwrap();
    }
    drop(writer);

    fs::write(shp_path.with_extension("prj"), WGS84_WKT).unwrap();
    shp_path
}

/// Zip a shapefile bundle's companion files into `bundle.zip`.
fn zip_bundle(dir: &Path, shp_path: &Path, extensions: &[&str]) -> PathBuf {
    let zip_path = dir.join("bundle.zip");
    let file = fs::File::create(&zip_path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);
    for extension in extensions {
        let member = shp_path.with_extension(extension);
        let name = member.file_name().unwrap().to_string_lossy().into_owned();
        zip.start_file(name, options).unwrap();
        zip.write_all(&fs::read(&member).unwrap()).unwrap();
    }
    zip.finish().unwrap();
    zip_path
}

#[test]
fn zipped_bundle_round_trips_features_and_attributes() {
    let dir = tempfile::tempdir().unwrap();
    let shp_path = write_fixture_shapefile(dir.path());
    let zip_path = zip_bundle(dir.path(), &shp_path, &["shp", "shx", "dbf", "prj"]);

    let boundaries = FakeBoundaries::new();
    let mut store = MemStore::new();
    let datafile_id =
        store.insert_datafile(DataFile::new("zones", FileKind::ShapefileZip, &zip_path));

    let summary = process_datafile(&mut store, &boundaries, datafile_id).unwrap();
    assert_eq!(summary.features, 2);

    // N features x M fields -> N x M attributes.
    let features = store.features_of(datafile_id);
    assert_eq!(features.len(), 2);
    for feature in &features {
        assert_eq!(feature.geometry.kind(), "MultiPolygon");
        assert_eq!(store.attributes_of(feature.id).len(), 2);
    }

    let first = store.attributes_of(features[0].id);
    assert_eq!(first[0].field_name, "NAME");
    assert_eq!(first[0].attr_type, "Character");
    assert_eq!(first[0].width, Some(20));
    assert_eq!(first[0].field_value, "Alpha");
    assert_eq!(first[1].field_name, "POP");
    assert_eq!(first[1].attr_type, "Numeric");
    assert_eq!(first[1].field_value, "1200");

    let datafile = store.datafile(datafile_id).unwrap();
    assert_eq!(datafile.state, ProcessState::Processed);
    assert!(datafile.processed());
    assert!(datafile.srs_wkt.as_deref().unwrap().contains("WGS_1984"));
    assert_eq!(datafile.geom_type.as_deref(), Some("Polygon"));

    // Square centroids are (2, 2) and (11, 11); the average lands between.
    let center = datafile.default_center.unwrap();
    assert_eq!((center.x(), center.y()), (6.5, 6.5));
}

#[test]
fn bare_shapefile_path_imports_without_an_archive() {
    let dir = tempfile::tempdir().unwrap();
    let shp_path = write_fixture_shapefile(dir.path());

    let boundaries = FakeBoundaries::new();
    let mut store = MemStore::new();
    let datafile_id =
        store.insert_datafile(DataFile::new("zones", FileKind::Shapefile, &shp_path));

    let summary = process_datafile(&mut store, &boundaries, datafile_id).unwrap();
    assert_eq!(summary.features, 2);
    assert_eq!(store.features_of(datafile_id).len(), 2);
}

#[test]
fn incomplete_bundle_fails_and_is_marked_failed() {
    let dir = tempfile::tempdir().unwrap();
    let shp_path = write_fixture_shapefile(dir.path());
    let zip_path = zip_bundle(dir.path(), &shp_path, &["shp", "dbf"]);

    let boundaries = FakeBoundaries::new();
    let mut store = MemStore::new();
    let datafile_id =
        store.insert_datafile(DataFile::new("broken", FileKind::ShapefileZip, &zip_path));

    let err = process_datafile(&mut store, &boundaries, datafile_id).unwrap_err();
    assert!(matches!(err, ProcessingError::IncompleteArchive { .. }));

    let datafile = store.datafile(datafile_id).unwrap();
    assert_eq!(datafile.state, ProcessState::Failed);
    assert!(!datafile.processed());
    assert!(datafile.process_note().unwrap().contains("missing"));
    assert!(store.features_of(datafile_id).is_empty());
}

#[test]
fn missing_prj_next_to_a_bare_shapefile_is_invalid() {
    let dir = tempfile::tempdir().unwrap();
    let shp_path = write_fixture_shapefile(dir.path());
    fs::remove_file(shp_path.with_extension("prj")).unwrap();

    let boundaries = FakeBoundaries::new();
    let mut store = MemStore::new();
    let datafile_id =
        store.insert_datafile(DataFile::new("no prj", FileKind::Shapefile, &shp_path));

    let err = process_datafile(&mut store, &boundaries, datafile_id).unwrap_err();
    assert!(matches!(err, ProcessingError::InvalidShapefile(_)));
}
