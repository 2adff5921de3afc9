pub mod paths;
pub mod remote;
pub mod storage;

pub use crate::paths::AffirmPaths;
pub use crate::remote::{HttpDocumentStore, OfflineDocumentStore, StaticTokenProvider};
pub use crate::storage::{ConfigStorage, FileKeyValueStore, MemoryKeyValueStore};
