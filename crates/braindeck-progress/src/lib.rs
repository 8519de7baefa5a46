//! BrainDeck Progression
//!
//! The ephemeral "continue this topic" chain and the pure grade-level
//! math driven by it. Nothing in this crate touches the store: chain
//! state lives in process memory and dies with it.

mod chain;
mod levels;

pub use chain::{ChainSnapshot, ContinueTracker};
pub use levels::{
    continues_until_next_level, next_grade_level, GradeLevel, LEVEL_UP_THRESHOLDS,
};
