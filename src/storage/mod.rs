//! Key-value persistence for the record collections.

pub mod json_backend;
pub mod memory;

use std::sync::Arc;

use crate::core::errors::SpendError;

pub type Result<T> = std::result::Result<T, SpendError>;

/// Minimal key-value store the ledger persists through. Each key holds one
/// collection serialized as a JSON array.
pub trait KeyValueStore: Send + Sync {
    /// Returns the stored text for `key`, or `None` when nothing was saved yet.
    fn load(&self, key: &str) -> Result<Option<String>>;
    fn save(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn load(&self, key: &str) -> Result<Option<String>> {
        (**self).load(key)
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        (**self).save(key, value)
    }
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;
