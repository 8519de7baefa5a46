//! In-memory application state
//!
//! The observable container for the quiz currently on screen, owned by
//! the application root and passed to consumers. Nothing here persists:
//! `clear()` puts the process back where a fresh start would.

use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use braindeck_progress::ContinueTracker;
use braindeck_quiz::Question;

/// What the view layer is currently showing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentQuiz {
    pub topic: Option<String>,
    pub grade_level: Option<String>,
    pub questions: Vec<Question>,
    /// Selected option per question, parallel to `questions`
    pub answers: Vec<Option<usize>>,
}

type Listener = Box<dyn Fn(&CurrentQuiz) + Send + Sync>;

pub struct AppState {
    current: Arc<RwLock<CurrentQuiz>>,
    listeners: Arc<RwLock<Vec<(u64, Listener)>>>,
    next_listener_id: Arc<AtomicU64>,
    chain: ContinueTracker,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            current: Arc::new(RwLock::new(CurrentQuiz::default())),
            listeners: Arc::new(RwLock::new(Vec::new())),
            next_listener_id: Arc::new(AtomicU64::new(1)),
            chain: ContinueTracker::new(),
        }
    }

    pub fn snapshot(&self) -> CurrentQuiz {
        self.current.read().clone()
    }

    /// Swap in a newly generated quiz; answers reset to unanswered.
    pub fn set_current_quiz(
        &self,
        topic: impl Into<String>,
        grade_level: impl Into<String>,
        questions: Vec<Question>,
    ) {
        {
            let mut current = self.current.write();
            current.answers = vec![None; questions.len()];
            current.topic = Some(topic.into());
            current.grade_level = Some(grade_level.into());
            current.questions = questions;
        }
        self.notify();
    }

    /// Record the selected option for one question. Out-of-range indexes
    /// are ignored rather than growing the answer list.
    pub fn record_answer(&self, question_index: usize, selected_option: usize) {
        {
            let mut current = self.current.write();
            let Some(slot) = current.answers.get_mut(question_index) else {
                return;
            };
            *slot = Some(selected_option);
        }
        self.notify();
    }

    /// Reset everything, continue chain included.
    pub fn clear(&self) {
        *self.current.write() = CurrentQuiz::default();
        self.chain.clear();
        self.notify();
    }

    pub fn chain(&self) -> &ContinueTracker {
        &self.chain
    }

    /// Register a change listener. Dropping the returned handle (or
    /// calling `unsubscribe`) detaches it.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&CurrentQuiz) + Send + Sync + 'static,
    {
        let id = self.next_listener_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.write().push((id, Box::new(listener)));

        Subscription {
            id,
            listeners: Arc::downgrade(&self.listeners),
        }
    }

    fn notify(&self) {
        let snapshot = self.current.read().clone();
        for (_, listener) in self.listeners.read().iter() {
            listener(&snapshot);
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for AppState {
    fn clone(&self) -> Self {
        Self {
            current: Arc::clone(&self.current),
            listeners: Arc::clone(&self.listeners),
            next_listener_id: Arc::clone(&self.next_listener_id),
            chain: self.chain.clone(),
        }
    }
}

/// Handle returned by `AppState::subscribe`.
pub struct Subscription {
    id: u64,
    listeners: Weak<RwLock<Vec<(u64, Listener)>>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Drop does the detach
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(listeners) = self.listeners.upgrade() {
            listeners.write().retain(|(id, _)| *id != self.id);
        }
    }
}
