use super::{validate_key, DocumentStore};
use crate::error::{NotekitError, Result};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use uuid::Uuid;

const DOC_EXT: &str = "json";

pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the file backing `key`, whether or not it exists yet.
    pub fn doc_path(&self, key: &str) -> Result<PathBuf> {
        validate_key(key)?;
        Ok(self.root.join(format!("{}.{}", key, DOC_EXT)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(NotekitError::Io)?;
        }
        Ok(())
    }
}

impl DocumentStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<Value>> {
        let path = self.doc_path(key)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&path).map_err(NotekitError::Io)?;
        let value = serde_json::from_str(&content).map_err(NotekitError::Serialization)?;
        Ok(Some(value))
    }

    fn write(&self, key: &str, doc: &Value) -> Result<()> {
        let path = self.doc_path(key)?;
        self.ensure_dir()?;

        let content = serde_json::to_string_pretty(doc).map_err(NotekitError::Serialization)?;
        let tmp_path = self.root.join(format!(".{}-{}.tmp", key, Uuid::new_v4()));
        fs::write(&tmp_path, content).map_err(NotekitError::Io)?;
        if let Err(e) = fs::rename(&tmp_path, &path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(NotekitError::Io(e));
        }

        debug!(key, path = %path.display(), "document written");
        Ok(())
    }
}
