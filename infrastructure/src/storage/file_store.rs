//! File-backed key-value store.
//!
//! Each key is stored as one file in a directory. Writes go to a
//! temporary file first and are renamed into place, so a crash never
//! leaves a half-written value behind.

use panel_application::{KeyValueStore, StorageError};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Durable key-value store rooted at a directory
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    /// Create a store rooted at `root`.
    ///
    /// The directory is created lazily on the first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Default location: `$XDG_CACHE_HOME/panel-desk`
    pub fn default_root() -> Option<PathBuf> {
        dirs::cache_dir().map(|d| d.join("panel-desk"))
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let name: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.root.join(format!("{}.json", name))
    }
}

fn map_io(e: std::io::Error) -> StorageError {
    if e.kind() == ErrorKind::StorageFull {
        StorageError::QuotaExceeded
    } else {
        StorageError::Io(e)
    }
}

impl KeyValueStore for FileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(map_io(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        fs::create_dir_all(&self.root).map_err(map_io)?;
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(map_io)?;
        fs::rename(&tmp, &path).map_err(map_io)?;
        debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(map_io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_get_remove() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path().join("nested"));

        assert_eq!(store.get("panel_discussion_cache").unwrap(), None);
        store.set("panel_discussion_cache", "{\"a\":1}").unwrap();
        assert_eq!(
            store.get("panel_discussion_cache").unwrap().as_deref(),
            Some("{\"a\":1}")
        );

        store.set("panel_discussion_cache", "{}").unwrap();
        assert_eq!(store.get("panel_discussion_cache").unwrap().as_deref(), Some("{}"));

        store.remove("panel_discussion_cache").unwrap();
        assert_eq!(store.get("panel_discussion_cache").unwrap(), None);
    }

    #[test]
    fn test_remove_missing_key_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.remove("never-written").unwrap();
    }

    #[test]
    fn test_values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileKeyValueStore::new(dir.path()).set("k", "v").unwrap();
        assert_eq!(
            FileKeyValueStore::new(dir.path()).get("k").unwrap().as_deref(),
            Some("v")
        );
    }

    #[test]
    fn test_keys_are_sanitized() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("../escape/attempt", "x").unwrap();
        assert!(dir.path().join("___escape_attempt.json").exists());
        assert_eq!(store.get("../escape/attempt").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_no_temp_file_left_behind() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileKeyValueStore::new(dir.path());
        store.set("k", "v").unwrap();
        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["k.json".to_string()]);
    }

    #[test]
    fn test_panel_cache_survives_restart() {
        use crate::system::{FixedLocale, SystemClock};
        use panel_application::PanelCacheStore;
        use chrono::Utc;
        use panel_domain::{ArticleId, ConsensusSummary, Language, PanelOpinion, Persona};
        use std::sync::Arc;

        let dir = tempfile::tempdir().unwrap();
        let open = || {
            PanelCacheStore::new(
                Arc::new(FileKeyValueStore::new(dir.path())),
                Arc::new(SystemClock),
                Arc::new(FixedLocale::new(Language::english())),
            )
        };
        let id = ArticleId::new("a1").unwrap();

        let opinions = vec![
            PanelOpinion::from_persona(Persona::Gpt4, "Rates bite.", Utc::now()),
            PanelOpinion::from_persona(Persona::Grok, "Priced in.", Utc::now()),
        ];
        let before = Utc::now();
        open().save_panel(
            &id,
            opinions.clone(),
            Some(ConsensusSummary::new("SELL", 40)),
            None,
        );

        let panel = open().get_panel(&id).expect("persisted across instances");
        assert_eq!(panel.opinions, opinions);
        assert_eq!(panel.consensus.unwrap().recommendation, "SELL");
        assert!(panel.timestamp <= Utc::now());
        assert!(panel.timestamp >= before - chrono::Duration::milliseconds(1));
    }
}
