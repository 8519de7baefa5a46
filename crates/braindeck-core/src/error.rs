//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] braindeck_storage::StorageError),

    #[error("Quiz store error: {0}")]
    Quiz(#[from] braindeck_quiz::QuizError),

    #[error("Privacy error: {0}")]
    Privacy(#[from] braindeck_privacy::PrivacyError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
