//! Host key-value side channels
//!
//! Two stores sit outside the main SQLite database: a file-backed
//! preferences map shared with the host app, and a transient map that
//! lives only as long as the process. The privacy wipe clears exactly
//! the keys listed here and nothing else - both channels also hold
//! host-environment data this core does not own.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::Result;

/// Persistent side-channel keys removed by the privacy wipe.
pub const PERSISTENT_WIPE_KEYS: &[&str] = &[
    "braindeck_settings",
    "braindeck_models_cache",
    "braindeck_language",
    "braindeck_telemetry_queue",
];

/// Transient side-channel keys removed by the privacy wipe.
pub const TRANSIENT_WIPE_KEYS: &[&str] = &["oauth_code_verifier"];

/// File-backed string map, loaded once and written through on mutation.
pub struct PrefsStore {
    path: PathBuf,
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl PrefsStore {
    /// A missing file is an empty store; a file appears on first write.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            path,
            entries: Arc::new(RwLock::new(entries)),
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write();
        entries.insert(key.to_string(), value.to_string());
        self.flush(&entries)
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write();
        if entries.remove(key).is_some() {
            self.flush(&entries)?;
        }
        Ok(())
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }

    fn flush(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let raw = serde_json::to_string_pretty(entries)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

impl Clone for PrefsStore {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            entries: Arc::clone(&self.entries),
        }
    }
}

/// Process-scoped string map; dies with the process.
pub struct TransientStore {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl TransientStore {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.entries.read().get(key).cloned()
    }

    pub fn set(&self, key: &str, value: &str) {
        self.entries
            .write()
            .insert(key.to_string(), value.to_string());
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.read().keys().cloned().collect()
    }
}

impl Default for TransientStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TransientStore {
    fn clone(&self) -> Self {
        Self {
            entries: Arc::clone(&self.entries),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefs_round_trip_across_opens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        {
            let prefs = PrefsStore::open(&path).unwrap();
            assert_eq!(prefs.get("braindeck_language"), None);
            prefs.set("braindeck_language", "en").unwrap();
        }

        let reopened = PrefsStore::open(&path).unwrap();
        assert_eq!(reopened.get("braindeck_language").as_deref(), Some("en"));
    }

    #[test]
    fn test_prefs_remove_is_a_no_op_for_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let prefs = PrefsStore::open(dir.path().join("prefs.json")).unwrap();

        prefs.remove("never_set").unwrap();

        prefs.set("a", "1").unwrap();
        prefs.remove("a").unwrap();
        assert_eq!(prefs.get("a"), None);
        assert!(prefs.keys().is_empty());
    }

    #[test]
    fn test_transient_store() {
        let store = TransientStore::new();

        store.set("oauth_code_verifier", "xyz");
        assert_eq!(store.get("oauth_code_verifier").as_deref(), Some("xyz"));

        store.remove("oauth_code_verifier");
        assert_eq!(store.get("oauth_code_verifier"), None);
    }

    #[test]
    fn test_wipe_key_lists_are_exact() {
        // The wipe contract enumerates these keys; a change here must be
        // deliberate, not incidental.
        assert_eq!(
            PERSISTENT_WIPE_KEYS,
            &[
                "braindeck_settings",
                "braindeck_models_cache",
                "braindeck_language",
                "braindeck_telemetry_queue",
            ]
        );
        assert_eq!(TRANSIENT_WIPE_KEYS, &["oauth_code_verifier"]);
    }
}
