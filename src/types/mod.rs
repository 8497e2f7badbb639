mod encoding;
mod file_kind;
mod geo_level;
mod ids;

pub use encoding::CharacterEncoding;
pub use file_kind::FileKind;
pub use geo_level::GeoLevel;
pub use ids::{AttributeId, DataFileId, FeatureId};
