//! BrainDeck Core
//!
//! Central coordination layer for the BrainDeck quiz app: the store
//! handle, the repositories, the in-memory state container and the
//! privacy operations, wired together behind one `App` object.

mod app;
mod config;
mod error;
mod state;

pub use app::App;
pub use config::Config;
pub use error::CoreError;
pub use state::{AppState, CurrentQuiz, Subscription};

// Re-export core components
pub use braindeck_privacy::{
    estimate_usage, format_storage_size, PrefsStore, PrivacyError, StorageUsage, TransientStore,
    PERSISTENT_WIPE_KEYS, TRANSIENT_WIPE_KEYS,
};
pub use braindeck_progress::{
    continues_until_next_level, next_grade_level, ChainSnapshot, ContinueTracker, GradeLevel,
    LEVEL_UP_THRESHOLDS,
};
pub use braindeck_quiz::{
    default_bundle, ApiCredential, LoadOutcome, NewSession, Question, QuizError, QuizSession,
    SampleBundle, SampleLoader, SampleQuiz, SessionPatch, SessionStore, SettingsStore, Topic,
    TopicStore, KEY_OPENROUTER_API_KEY, KEY_SAMPLES_VERSION, KEY_WELCOME_VERSION,
};
pub use braindeck_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
