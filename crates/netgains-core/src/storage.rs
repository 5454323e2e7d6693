use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::{ports::KeyValueStore, Result};

/// [`KeyValueStore`] over a single JSON object file (string keys, string
/// values) — the per-device storage backing the widget blob.
///
/// Reads tolerate a missing or empty file; writes go through a lock so
/// read-modify-write cycles don't interleave.
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }
        let txt = fs::read_to_string(&self.path)?;
        if txt.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&txt)?)
    }

    fn write_all(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let txt = serde_json::to_string(entries)?;
        fs::write(&self.path, txt)?;
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for JsonFileStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(self.read_all()?.remove(key))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(prefix: &str) -> PathBuf {
        let ts = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let pid = std::process::id();
        PathBuf::from(format!("/tmp/{prefix}-{pid}-{ts}.json"))
    }

    #[test]
    fn path_reports_backing_file() {
        let p = tmp_file("netgains-kv-path");
        let store = JsonFileStore::new(p.clone());
        assert_eq!(store.path(), p.as_path());
    }

    #[tokio::test]
    async fn get_on_missing_file_is_none() {
        let store = JsonFileStore::new(tmp_file("netgains-kv-missing"));
        assert_eq!(store.get("dashboard_widgets").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get_roundtrips() {
        let store = JsonFileStore::new(tmp_file("netgains-kv"));
        store.set("a", "[1,2,3]").await.unwrap();
        store.set("b", "x").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("x"));

        // Overwrite keeps other keys.
        store.set("a", "[]").await.unwrap();
        assert_eq!(store.get("a").await.unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("b").await.unwrap().as_deref(), Some("x"));
    }

    #[tokio::test]
    async fn empty_file_reads_as_empty_store() {
        let path = tmp_file("netgains-kv-empty");
        fs::write(&path, "").unwrap();
        let store = JsonFileStore::new(path);
        assert_eq!(store.get("a").await.unwrap(), None);
    }
}
