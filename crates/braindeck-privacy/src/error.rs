//! Privacy error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PrivacyError {
    #[error("Storage error: {0}")]
    Storage(#[from] braindeck_storage::StorageError),

    #[error("Quiz store error: {0}")]
    Quiz(#[from] braindeck_quiz::QuizError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Preferences file error: {0}")]
    Io(#[from] std::io::Error),
}
