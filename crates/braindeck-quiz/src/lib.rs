//! BrainDeck Quiz Persistence
//!
//! Repositories over the three store collections (topics, sessions,
//! settings) plus the versioned sample-quiz bootstrap. Not-found is never
//! an error in this crate: point lookups return `Ok(None)` so callers can
//! branch without catching.

mod error;
mod models;
mod samples;
mod sessions;
mod settings;
mod topics;

pub use error::QuizError;
pub use models::{NewSession, Question, QuizSession, SessionPatch, Topic};
pub use samples::{default_bundle, LoadOutcome, SampleBundle, SampleLoader, SampleQuiz};
pub use sessions::SessionStore;
pub use settings::{
    ApiCredential, SettingsStore, KEY_OPENROUTER_API_KEY, KEY_SAMPLES_VERSION, KEY_WELCOME_VERSION,
};
pub use topics::TopicStore;

pub type Result<T> = std::result::Result<T, QuizError>;
