//! Storage collaborators
//!
//! The desk only needs whole-collection load and save. [`FileStorage`] keeps
//! each collection as a YAML file; [`MemoryStorage`] keeps them in process.

mod file;
mod memory;
mod repository;

pub use file::FileStorage;
pub use memory::MemoryStorage;
pub use repository::{CollectionStore, REPLIES_KEY, SYSTEM_LOGS_KEY, TICKETS_KEY};
