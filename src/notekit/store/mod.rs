//! # Storage Layer
//!
//! This module defines the storage abstraction for notekit. The [`DocumentStore`]
//! trait is a small key-value store where every key holds one JSON document.
//!
//! ## Design Rationale
//!
//! Storage is abstracted behind a trait to:
//! - Enable **testing** with `InMemoryStore` (no filesystem needed)
//! - Allow **other backends** (IndexedDB bridge, SQLite, ...) without touching core logic
//! - Keep the settings store and the catalog **decoupled** from persistence details
//!
//! ## Implementations
//!
//! - [`fs::FileStore`]: Production file-based storage
//!   - One `<key>.json` file per document
//!   - Writes go to a temp file first and are renamed into place
//!
//! - [`memory::InMemoryStore`]: In-memory storage for testing
//!   - No persistence
//!   - Can simulate write failures
//!
//! ## Storage Format
//!
//! For `FileStore`:
//! ```text
//! <data dir>/
//! ├── settings.json       # The pinboard settings document
//! ├── catalog.json        # Notebooks, topics and tags
//! └── config.json         # NotekitConfig
//! ```
//!
//! All methods take `&self`. Backends that need mutation use interior
//! mutability; notekit is single-threaded so `RefCell` is enough.

use crate::error::{NotekitError, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

pub mod fs;
pub mod memory;

/// Abstract interface for document storage.
pub trait DocumentStore {
    /// Read the document stored under `key`, `None` if there is none.
    fn read(&self, key: &str) -> Result<Option<Value>>;

    /// Replace the document stored under `key`.
    fn write(&self, key: &str, doc: &Value) -> Result<()>;

    fn read_doc<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>>
    where
        Self: Sized,
    {
        match self.read(key)? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    fn write_doc<T: Serialize>(&self, key: &str, doc: &T) -> Result<()>
    where
        Self: Sized,
    {
        let value = serde_json::to_value(doc)?;
        self.write(key, &value)
    }
}

/// Keys double as file names, so they are restricted to a safe alphabet.
pub fn validate_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(NotekitError::Storage(format!("Invalid document key: {:?}", key)))
    }
}
