//! Quiz persistence error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuizError {
    #[error("Storage error: {0}")]
    Storage(#[from] braindeck_storage::StorageError),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
