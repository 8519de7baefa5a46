//! Storage usage estimation
//!
//! Read-only: serializes what is currently stored to approximate its
//! on-disk footprint for the settings screen. The numbers are a display
//! estimate, not an accounting of actual database pages.

use braindeck_quiz::{SessionStore, TopicStore};
use braindeck_storage::Database;

use crate::side_channel::{PrefsStore, PERSISTENT_WIPE_KEYS};
use crate::Result;

#[derive(Debug, Clone, PartialEq)]
pub struct StorageUsage {
    /// Settings rows plus the persistent side-channel values
    pub settings_bytes: u64,
    /// All sessions and topics
    pub quizzes_bytes: u64,
    pub total_bytes: u64,
    pub settings_display: String,
    pub quizzes_display: String,
    pub total_display: String,
}

pub fn estimate_usage(db: &Database, prefs: &PrefsStore) -> Result<StorageUsage> {
    let mut settings_bytes: u64 = 0;
    for (key, value) in db.all_settings()? {
        settings_bytes += (key.len() + value.len()) as u64;
    }
    for key in PERSISTENT_WIPE_KEYS {
        if let Some(value) = prefs.get(key) {
            settings_bytes += (key.len() + value.len()) as u64;
        }
    }

    let mut quizzes_bytes: u64 = 0;
    let sessions = SessionStore::new(db.clone()).get_all_sessions()?;
    for session in &sessions {
        quizzes_bytes += serde_json::to_vec(session)?.len() as u64;
    }
    let topics = TopicStore::new(db.clone()).get_all_topics()?;
    for topic in &topics {
        quizzes_bytes += serde_json::to_vec(topic)?.len() as u64;
    }

    let total_bytes = settings_bytes + quizzes_bytes;

    Ok(StorageUsage {
        settings_bytes,
        quizzes_bytes,
        total_bytes,
        settings_display: format_storage_size(settings_bytes as f64),
        quizzes_display: format_storage_size(quizzes_bytes as f64),
        total_display: format_storage_size(total_bytes as f64),
    })
}

/// Base-1024 units; whole bytes show no decimals, KB and above show one.
/// Zero, negative and non-finite inputs all read "0 B".
pub fn format_storage_size(bytes: f64) -> String {
    if !bytes.is_finite() || bytes <= 0.0 {
        return "0 B".to_string();
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];

    let mut size = bytes;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }

    if unit == 0 {
        format!("{} B", size.round() as u64)
    } else {
        format!("{:.1} {}", size, UNITS[unit])
    }
}
