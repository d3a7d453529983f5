use super::KeyValueStore;
use crate::error::{LessonError, Result};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

const STORAGE_FILENAME: &str = "storage.json";

/// File-backed key/value store.
///
/// Every operation reads `storage.json` fresh, so several processes may take
/// turns on the same directory. Writes replace the file atomically.
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn storage_path(&self) -> PathBuf {
        self.root.join(STORAGE_FILENAME)
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LessonError::Io)?;
        }
        Ok(())
    }

    fn load(&self) -> Result<BTreeMap<String, String>> {
        let path = self.storage_path();
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&path).map_err(LessonError::Io)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            LessonError::Store(format!("{} is not a valid store: {}", path.display(), e))
        })
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        self.ensure_dir()?;
        let path = self.storage_path();
        let tmp = path.with_extension("json.tmp");
        let content = serde_json::to_string_pretty(entries).map_err(LessonError::Serialization)?;
        fs::write(&tmp, content).map_err(LessonError::Io)?;
        fs::rename(&tmp, &path).map_err(LessonError::Io)?;
        debug!(path = %path.display(), entries = entries.len(), "store saved");
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.load()?.into_keys().collect())
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}
