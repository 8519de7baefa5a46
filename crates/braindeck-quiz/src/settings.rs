//! Typed settings store and the provider credential lifecycle
//!
//! Values live in the settings table as JSON text. A missing key reads
//! back as `Ok(None)` so callers can tell "never set" apart from any
//! stored value; a present-but-corrupt value is an error, not `None`.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use braindeck_storage::Database;

use crate::Result;

/// Provider credential payload. Presence of this setting is what
/// "connected" means.
pub const KEY_OPENROUTER_API_KEY: &str = "openrouter_api_key";
/// Opaque version token of the currently seeded sample bundle.
pub const KEY_SAMPLES_VERSION: &str = "samplesVersion";
/// Opaque version token gating first-run UI; owned by the view layer but
/// stored through this mechanism.
pub const KEY_WELCOME_VERSION: &str = "welcomeVersion";

/// The stored provider API key plus its capture timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiCredential {
    pub key: String,
    /// Stamped by the store at save time, never caller-supplied
    pub stored_at: DateTime<Utc>,
}

pub struct SettingsStore {
    db: Database,
}

impl SettingsStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self.db.get_setting(key)? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.db.set_setting(key, &raw)?;
        Ok(())
    }

    pub fn remove(&self, key: &str) -> Result<()> {
        self.db.delete_setting(key)?;
        Ok(())
    }

    // === Credential lifecycle ===

    /// Store the provider key. The capture timestamp is taken here, at
    /// call time, so the UI layer cannot supply a skewed clock.
    pub fn store_openrouter_key(&self, secret: &str) -> Result<()> {
        let credential = ApiCredential {
            key: secret.to_string(),
            stored_at: Utc::now(),
        };
        self.set(KEY_OPENROUTER_API_KEY, &credential)?;

        tracing::info!("Stored provider API key");

        Ok(())
    }

    /// The secret alone; the full payload stays inside this store.
    pub fn get_openrouter_key(&self) -> Result<Option<String>> {
        let credential: Option<ApiCredential> = self.get(KEY_OPENROUTER_API_KEY)?;
        Ok(credential.map(|c| c.key))
    }

    pub fn remove_openrouter_key(&self) -> Result<()> {
        self.remove(KEY_OPENROUTER_API_KEY)?;

        tracing::info!("Removed provider API key");

        Ok(())
    }

    /// Reads the store on every call; no cached connection state.
    pub fn is_openrouter_connected(&self) -> Result<bool> {
        let credential: Option<ApiCredential> = self.get(KEY_OPENROUTER_API_KEY)?;
        Ok(credential.is_some_and(|c| !c.key.is_empty()))
    }

    // === Version tokens ===

    pub fn get_samples_version(&self) -> Result<Option<String>> {
        self.get(KEY_SAMPLES_VERSION)
    }

    pub fn set_samples_version(&self, version: &str) -> Result<()> {
        self.set(KEY_SAMPLES_VERSION, &version)
    }

    pub fn get_welcome_version(&self) -> Result<Option<String>> {
        self.get(KEY_WELCOME_VERSION)
    }

    pub fn set_welcome_version(&self, version: &str) -> Result<()> {
        self.set(KEY_WELCOME_VERSION, &version)
    }
}

impl Clone for SettingsStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
