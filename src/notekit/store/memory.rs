use super::DocumentStore;
use crate::error::{NotekitError, Result};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::HashMap;

/// In-memory storage for testing and development.
/// Does NOT persist data.
///
/// Uses `RefCell` for interior mutability since notekit is single-threaded.
#[derive(Default)]
pub struct InMemoryStore {
    docs: RefCell<HashMap<String, Value>>,
    writes: Cell<usize>,
    simulate_write_error: Cell<bool>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        self.writes.get()
    }
}

impl DocumentStore for InMemoryStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.docs.borrow().get(key).cloned())
    }

    fn write(&self, key: &str, doc: &Value) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(NotekitError::Storage("Simulated write error".to_string()));
        }
        self.docs.borrow_mut().insert(key.to_string(), doc.clone());
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::catalog::Catalog;
    use crate::model::{Pin, SettingsDocument};

    pub const SETTINGS_KEY: &str = "settings";

    pub struct StoreFixture {
        pub store: InMemoryStore,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: InMemoryStore::new(),
            }
        }

        pub fn with_pins(self, pins: Vec<Pin>) -> Self {
            let mut doc = SettingsDocument::fresh();
            doc.pins = pins;
            self.store.write_doc(SETTINGS_KEY, &doc).unwrap();
            self
        }

        /// A catalog with notebook `nb1` ("Work", topic `tp1` "Meetings") and tag `t1` ("urgent").
        pub fn with_sample_catalog(self) -> Self {
            let catalog = sample_catalog();
            catalog.save(&self.store).unwrap();
            self
        }
    }

    pub fn sample_catalog() -> Catalog {
        let mut catalog = Catalog::default();
        catalog.insert_notebook_with_id("nb1", "Work");
        catalog
            .insert_topic_with_id("nb1", "tp1", "Meetings")
            .unwrap();
        catalog.insert_tag_with_id("t1", "urgent");
        catalog
    }
}
