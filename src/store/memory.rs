use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;

use crate::error::ProcessingError;
use crate::store::records::{Attribute, DataFile, Feature};
use crate::store::store::Store;
use crate::types::{AttributeId, DataFileId, FeatureId};

/// Simple in-memory store. BTreeMaps keep iteration in id order, which is
/// also insertion order.
#[derive(Debug, Default)]
pub struct MemStore {
    datafiles: BTreeMap<u64, DataFile>,
    features: BTreeMap<u64, Feature>,
    attributes: BTreeMap<u64, Attribute>,
    next_datafile: u64,
    next_feature: u64,
    next_attribute: u64,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemStore {
    fn insert_datafile(&mut self, mut datafile: DataFile) -> DataFileId {
        self.next_datafile += 1;
        let id = DataFileId(self.next_datafile);
        datafile.id = id;
        self.datafiles.insert(id.0, datafile);
        id
    }

    fn datafile(&self, id: DataFileId) -> Option<&DataFile> {
        self.datafiles.get(&id.0)
    }

    fn datafile_mut(&mut self, id: DataFileId) -> Option<&mut DataFile> {
        self.datafiles.get_mut(&id.0)
    }

    fn insert_feature(&mut self, mut feature: Feature) -> FeatureId {
        self.next_feature += 1;
        let id = FeatureId(self.next_feature);
        feature.id = id;
        self.features.insert(id.0, feature);
        id
    }

    fn insert_attribute(&mut self, mut attribute: Attribute) -> AttributeId {
        self.next_attribute += 1;
        let id = AttributeId(self.next_attribute);
        attribute.id = id;
        self.attributes.insert(id.0, attribute);
        id
    }

    fn features_of(&self, id: DataFileId) -> Vec<&Feature> {
        self.features
            .values()
            .filter(|feature| feature.datafile == id)
            .collect()
    }

    fn attributes_of(&self, id: FeatureId) -> Vec<&Attribute> {
        self.attributes
            .values()
            .filter(|attribute| attribute.feature == id)
            .collect()
    }

    fn find_boundary(&self, reference: &str, federal_geo_id: &str) -> Option<&Feature> {
        self.features
            .values()
            .find(|feature| feature.reference == reference && feature.federal_geo_id == federal_geo_id)
    }

    fn field_names(&self, id: DataFileId) -> Vec<String> {
        let Some(first) = self.features_of(id).into_iter().next() else {
            return Vec::new();
        };
        self.attributes_of(first.id)
            .into_iter()
            .map(|attribute| attribute.field_name.clone())
            .collect()
    }

    fn remove_datafile(&mut self, id: DataFileId) -> Result<(), ProcessingError> {
        let datafile = self
            .datafiles
            .remove(&id.0)
            .ok_or(ProcessingError::UnknownDataFile(id))?;

        let owned: Vec<u64> = self
            .features
            .iter()
            .filter(|(_, feature)| feature.datafile == id)
            .map(|(&key, _)| key)
            .collect();
        for key in owned {
            self.features.remove(&key);
            self.attributes.retain(|_, attribute| attribute.feature != FeatureId(key));
        }

        match fs::remove_file(&datafile.stored_path) {
            Err(err) if err.kind() != ErrorKind::NotFound => Err(err.into()),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::GeometrySlot;
    use crate::types::FileKind;
    use geo::{point, polygon, MultiPolygon};

    fn square_slot() -> GeometrySlot {
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.0, y: 1.0),
            (x: 1.0, y: 1.0),
            (x: 1.0, y: 0.0),
        ];
        GeometrySlot::MultiPolygon(MultiPolygon(vec![square]))
    }

    #[test]
    fn ids_are_assigned_on_insert() {
        let mut store = MemStore::new();
        let first = store.insert_datafile(DataFile::new("a", FileKind::Kml, "/tmp/a.kml"));
        let second = store.insert_datafile(DataFile::new("b", FileKind::Kml, "/tmp/b.kml"));
        assert_ne!(first, second);
        assert_eq!(store.datafile(first).unwrap().name, "a");
    }

    #[test]
    fn find_boundary_matches_reference_and_geo_id() {
        let mut store = MemStore::new();
        let id = store.insert_datafile(DataFile::new("acs", FileKind::Kml, "/tmp/acs.csv"));
        store.insert_feature(Feature::new(id, "Census counties", "06073", square_slot()));

        assert!(store.find_boundary("Census counties", "06073").is_some());
        assert!(store.find_boundary("Census tracts", "06073").is_none());
        assert!(store.find_boundary("Census counties", "06074").is_none());
    }

    #[test]
    fn field_names_come_from_the_first_feature() {
        let mut store = MemStore::new();
        let id = store.insert_datafile(DataFile::new("f", FileKind::Shapefile, "/tmp/f.shp"));
        let feature = store.insert_feature(Feature::new(
            id,
            "",
            "",
            GeometrySlot::Point(point!(x: 1.0, y: 2.0)),
        ));
        store.insert_attribute(Attribute::new(feature, "NAME", "Character", Some(20), None, "x"));
        store.insert_attribute(Attribute::new(feature, "POP", "Numeric", Some(10), None, "3"));

        assert_eq!(store.field_names(id), vec!["NAME".to_string(), "POP".to_string()]);
    }

    #[test]
    fn remove_cascades_and_deletes_the_stored_file() {
        let dir = tempfile::tempdir().unwrap();
        let stored = dir.path().join("upload.csv");
        fs::write(&stored, "Id,Name\n").unwrap();

        let mut store = MemStore::new();
        let id = store.insert_datafile(DataFile::new("doomed", FileKind::Kml, &stored));
        let keep = store.insert_datafile(DataFile::new("kept", FileKind::Kml, "/tmp/kept.kml"));
        let feature = store.insert_feature(Feature::new(id, "r", "1", square_slot()));
        store.insert_attribute(Attribute::new(feature, "Name", "", None, None, "v"));
        let other = store.insert_feature(Feature::new(keep, "r", "2", square_slot()));

        store.remove_datafile(id).unwrap();

        assert!(store.datafile(id).is_none());
        assert!(store.features_of(id).is_empty());
        assert!(store.attributes_of(feature).is_empty());
        assert!(!stored.exists());
        // Unrelated records survive.
        assert!(store.datafile(keep).is_some());
        assert_eq!(store.features_of(keep).len(), 1);
        assert_eq!(store.features_of(keep)[0].id, other);
    }

    #[test]
    fn remove_tolerates_an_already_missing_file() {
        let mut store = MemStore::new();
        let id = store.insert_datafile(DataFile::new("gone", FileKind::Kml, "/tmp/does-not-exist.kml"));
        assert!(store.remove_datafile(id).is_ok());
    }
}
