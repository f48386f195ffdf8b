pub mod json_file;
pub mod memory;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// Device-local key/value storage over JSON payloads.
///
/// Writes are whole-value overwrites; `remove` on a missing key is not an error.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<serde_json::Value>>;
    fn set(&self, key: &str, value: &serde_json::Value) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
