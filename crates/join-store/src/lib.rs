pub mod atomic;
pub mod envelope;
pub mod json_file_store;
pub mod memory;
pub mod traits;
pub mod watch;

pub use envelope::{BoardDocument, BoardEnvelope};
pub use json_file_store::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::{ContactStore, TaskStore};
pub use watch::StoreWatcher;
