mod events;
mod memory;
mod records;
mod store;

pub use events::{ProcessingEvent, Stage};
pub use memory::MemStore;
pub use records::{validate_upload, Attribute, DataFile, Feature, ProcessState};
pub use store::Store;
