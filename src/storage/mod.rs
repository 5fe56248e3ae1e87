//! Durable key-value slots the ledger store persists into.

pub mod json_backend;
pub mod memory;

use crate::errors::Result;

/// Abstraction over a durable string-valued key-value slot.
///
/// Mirrors the get/set surface of browser local storage: a missing key reads
/// as `None` and a write replaces whatever was stored before.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

pub use json_backend::JsonFileStore;
pub use memory::MemoryStore;
