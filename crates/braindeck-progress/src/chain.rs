//! Continue-chain state machine
//!
//! Two states: uninitialized and active. The chain accumulates the
//! prompts of every round so the generation collaborator can avoid
//! repeating questions, and its counter feeds the grade progression.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Point-in-time view of an active chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainSnapshot {
    /// Captured at chain initialization
    pub topic: String,
    /// Captured at chain initialization
    pub starting_grade_level: String,
    /// Continuation rounds completed so far
    pub continue_count: u32,
    /// Prompt texts accumulated across every round
    pub previous_questions: Vec<String>,
}

pub struct ContinueTracker {
    chain: Arc<RwLock<Option<ChainSnapshot>>>,
}

impl ContinueTracker {
    pub fn new() -> Self {
        Self {
            chain: Arc::new(RwLock::new(None)),
        }
    }

    /// Start a chain for `topic`, replacing any previous one.
    pub fn init(
        &self,
        topic: impl Into<String>,
        starting_grade_level: impl Into<String>,
        initial_prompts: Vec<String>,
    ) {
        let snapshot = ChainSnapshot {
            topic: topic.into(),
            starting_grade_level: starting_grade_level.into(),
            continue_count: 0,
            previous_questions: initial_prompts,
        };

        tracing::debug!(topic = %snapshot.topic, "Started continue chain");

        *self.chain.write() = Some(snapshot);
    }

    /// Record one continuation round. Silently does nothing when no
    /// chain is active.
    pub fn push(&self, new_prompts: Vec<String>) {
        let mut guard = self.chain.write();
        let Some(chain) = guard.as_mut() else {
            return;
        };

        chain.continue_count += 1;
        chain.previous_questions.extend(new_prompts);
    }

    /// Back to uninitialized, discarding all chain state.
    pub fn clear(&self) {
        *self.chain.write() = None;
    }

    /// `None` means no chain is active.
    pub fn snapshot(&self) -> Option<ChainSnapshot> {
        self.chain.read().clone()
    }

    pub fn is_active(&self) -> bool {
        self.chain.read().is_some()
    }
}

impl Default for ContinueTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for ContinueTracker {
    fn clone(&self) -> Self {
        Self {
            chain: Arc::clone(&self.chain),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompts(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    #[test]
    fn test_init_and_push() {
        let tracker = ContinueTracker::new();
        assert!(!tracker.is_active());

        tracker.init("Volcanoes", "elementary", prompts(&["q1", "q2"]));

        let chain = tracker.snapshot().unwrap();
        assert_eq!(chain.topic, "Volcanoes");
        assert_eq!(chain.starting_grade_level, "elementary");
        assert_eq!(chain.continue_count, 0);
        assert_eq!(chain.previous_questions, prompts(&["q1", "q2"]));

        tracker.push(prompts(&["q3"]));
        tracker.push(prompts(&["q4", "q5"]));

        let chain = tracker.snapshot().unwrap();
        assert_eq!(chain.continue_count, 2);
        assert_eq!(
            chain.previous_questions,
            prompts(&["q1", "q2", "q3", "q4", "q5"])
        );
    }

    #[test]
    fn test_push_without_init_is_a_no_op() {
        let tracker = ContinueTracker::new();

        tracker.push(prompts(&["q1"]));

        assert!(tracker.snapshot().is_none());
    }

    #[test]
    fn test_clear_discards_state() {
        let tracker = ContinueTracker::new();
        tracker.init("Volcanoes", "elementary", prompts(&["q1"]));
        tracker.push(prompts(&["q2"]));

        tracker.clear();

        assert!(tracker.snapshot().is_none());
        // Push after clear stays a no-op
        tracker.push(prompts(&["q3"]));
        assert!(!tracker.is_active());
    }

    #[test]
    fn test_init_replaces_previous_chain() {
        let tracker = ContinueTracker::new();
        tracker.init("Volcanoes", "elementary", prompts(&["q1"]));
        tracker.push(prompts(&["q2"]));

        tracker.init("Glaciers", "high school", prompts(&["g1"]));

        let chain = tracker.snapshot().unwrap();
        assert_eq!(chain.topic, "Glaciers");
        assert_eq!(chain.continue_count, 0);
        assert_eq!(chain.previous_questions, prompts(&["g1"]));
    }
}
