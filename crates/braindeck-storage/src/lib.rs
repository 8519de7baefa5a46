//! BrainDeck Storage Layer
//!
//! SQLite-based persistence for all quiz state. The schema is versioned
//! and upgrades run once when the store is opened.

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
