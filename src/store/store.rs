use crate::error::ProcessingError;
use crate::store::records::{Attribute, DataFile, Feature};
use crate::types::{AttributeId, DataFileId, FeatureId};

/// Record persistence seam.
///
/// The pipeline and importers are written against this trait so embedders
/// can keep records wherever they like; the crate ships an in-memory
/// implementation. Ids are assigned by the store on insert.
pub trait Store {
    fn insert_datafile(&mut self, datafile: DataFile) -> DataFileId;
    fn datafile(&self, id: DataFileId) -> Option<&DataFile>;
    fn datafile_mut(&mut self, id: DataFileId) -> Option<&mut DataFile>;

    fn insert_feature(&mut self, feature: Feature) -> FeatureId;
    fn insert_attribute(&mut self, attribute: Attribute) -> AttributeId;

    /// Features owned by a datafile, in insertion order.
    fn features_of(&self, id: DataFileId) -> Vec<&Feature>;

    /// Attributes owned by a feature, in insertion order.
    fn attributes_of(&self, id: FeatureId) -> Vec<&Attribute>;

    /// First feature anywhere in the store matching a reference label and
    /// federal geo-id; lets ACS imports reuse an already-fetched boundary.
    fn find_boundary(&self, reference: &str, federal_geo_id: &str) -> Option<&Feature>;

    /// Attribute field names of the datafile's first feature.
    fn field_names(&self, id: DataFileId) -> Vec<String>;

    /// Delete a datafile, its features and attributes, and the backing
    /// stored file. A user action, never triggered by the pipeline.
    fn remove_datafile(&mut self, id: DataFileId) -> Result<(), ProcessingError>;
}
