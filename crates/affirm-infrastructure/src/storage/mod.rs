//! Storage layer for atomic file operations and key-value adapters.

mod atomic_file;
mod config_storage;
mod file_kv_store;
mod memory_kv_store;

pub use atomic_file::{AtomicFile, AtomicFileError};
pub use config_storage::{ConfigStorage, ENV_API_TOKEN, ENV_REMOTE_URL};
pub use file_kv_store::FileKeyValueStore;
pub use memory_kv_store::MemoryKeyValueStore;
