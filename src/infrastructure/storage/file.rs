use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dashmap::DashMap;
use tracing::{debug, warn};

use super::LocalStore;
use crate::support::errors::InfraError;

/// JSON-file backed store.
///
/// The whole map is rewritten on every change. A missing or unreadable file
/// starts empty.
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
    write_lock: Mutex<()>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match std::fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => {
                    debug!(path = %path.display(), keys = map.len(), "Local store loaded");
                    for (key, value) in map {
                        entries.insert(key, value);
                    }
                }
                Err(e) => warn!(path = %path.display(), error = %e, "Local store unreadable, starting empty"),
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => warn!(path = %path.display(), error = %e, "Local store unreadable, starting empty"),
        }

        Self {
            path,
            entries,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), InfraError> {
        let _guard = self
            .write_lock
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let snapshot: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&snapshot)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl LocalStore for FileStore {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|v| v.value().clone())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), InfraError> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn remove_item(&self, key: &str) -> Result<(), InfraError> {
        if self.entries.remove(key).is_some() {
            self.persist()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("local-storage.json");

        let store = FileStore::open(&path);
        assert_eq!(store.get_item("theme"), None);
        store.set_item("theme", "dark").unwrap();
        store.set_item("adminDraft", "{\"ci\":\"1234567\"}").unwrap();

        let reopened = FileStore::open(&path);
        assert_eq!(reopened.get_item("theme").as_deref(), Some("dark"));

        reopened.remove_item("adminDraft").unwrap();
        assert_eq!(FileStore::open(&path).get_item("adminDraft"), None);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("local-storage.json");
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::open(&path);
        assert_eq!(store.get_item("theme"), None);
        store.set_item("theme", "light").unwrap();
        assert_eq!(FileStore::open(&path).get_item("theme").as_deref(), Some("light"));
    }
}
