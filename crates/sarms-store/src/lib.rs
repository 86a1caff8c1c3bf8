//! Storage layer: in-memory request store and JSON snapshot files.

mod memory;
mod snapshot;

pub use memory::MemoryStore;
pub use sarms_core::StoreError;
pub use snapshot::{load_snapshot, save_snapshot};
