//! BrainDeck Privacy
//!
//! The key-value side channels that live outside the main store, the
//! exact key lists the privacy wipe clears from them, and the read-only
//! storage usage estimate shown in settings.

mod error;
mod side_channel;
mod usage;

pub use error::PrivacyError;
pub use side_channel::{
    PrefsStore, TransientStore, PERSISTENT_WIPE_KEYS, TRANSIENT_WIPE_KEYS,
};
pub use usage::{estimate_usage, format_storage_size, StorageUsage};

pub type Result<T> = std::result::Result<T, PrivacyError>;
