mod center;
mod convert;
mod geojson;
mod reproject;
mod slot;

pub use center::average_center;
pub use geojson::{geometry_from_geojson, slot_to_geojson};
pub use slot::GeometrySlot;

pub(crate) use convert::{shape_kind_name, shape_to_geometry};
pub(crate) use reproject::CrsTransform;
