//! Quiz data structures

use serde::{Deserialize, Serialize};

/// A subject area the user practices, with aggregate stats.
///
/// The counters are maintained by the caller; this crate stores whatever
/// it is given and never recomputes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Caller-chosen identifier (usually derived from the topic text)
    pub id: String,
    /// Display name
    pub name: String,
    pub grade_level: Option<String>,
    /// Epoch millis
    pub created_at: Option<i64>,
    /// Epoch millis of the most recent attempt
    pub last_practiced: Option<i64>,
    pub total_questions: i64,
    pub correct_answers: i64,
}

/// One generated question inside a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_index: usize,
    /// Cached "why is this the right answer" text, generated once and
    /// reused across repeat views
    pub right_answer_explanation: Option<String>,
    pub user_answer: Option<usize>,
}

impl Question {
    pub fn new(prompt: impl Into<String>, options: Vec<String>, correct_index: usize) -> Self {
        Self {
            prompt: prompt.into(),
            options,
            correct_index,
            right_answer_explanation: None,
            user_answer: None,
        }
    }
}

/// One quiz attempt, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizSession {
    /// Store-assigned, strictly increasing, never reused
    pub id: i64,
    /// Soft reference to `Topic::id`; absent for ad hoc attempts
    pub topic_id: Option<String>,
    /// Display string
    pub topic: String,
    pub grade_level: Option<String>,
    /// Epoch millis; drives recency ordering, updated on replay
    pub timestamp: i64,
    pub score: Option<i64>,
    pub total_questions: i64,
    pub questions: Option<Vec<Question>>,
    /// Per-question selected option, parallel to `questions`
    pub answers: Option<Vec<Option<usize>>>,
    /// Protected seed content, excluded from user-data deletion
    pub is_sample: bool,
}

impl QuizSession {
    /// A session that no longer carries its question set cannot be
    /// replayed.
    pub fn can_replay(&self) -> bool {
        self.questions.as_ref().is_some_and(|q| !q.is_empty())
    }
}

/// A session about to be persisted; the id is assigned by the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewSession {
    pub topic_id: Option<String>,
    pub topic: String,
    pub grade_level: Option<String>,
    pub timestamp: i64,
    pub score: Option<i64>,
    pub total_questions: i64,
    pub questions: Option<Vec<Question>>,
    pub answers: Option<Vec<Option<usize>>>,
    pub is_sample: bool,
}

/// Partial update for `SessionStore::update_session`.
///
/// `None` fields are left untouched on the stored record (shallow merge).
/// Identity (`id`) and the sample flag cannot be patched.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub topic_id: Option<String>,
    pub topic: Option<String>,
    pub grade_level: Option<String>,
    pub timestamp: Option<i64>,
    pub score: Option<i64>,
    pub total_questions: Option<i64>,
    pub questions: Option<Vec<Question>>,
    pub answers: Option<Vec<Option<usize>>>,
}

impl SessionPatch {
    pub fn apply(self, session: &mut QuizSession) {
        if let Some(topic_id) = self.topic_id {
            session.topic_id = Some(topic_id);
        }
        if let Some(topic) = self.topic {
            session.topic = topic;
        }
        if let Some(grade_level) = self.grade_level {
            session.grade_level = Some(grade_level);
        }
        if let Some(timestamp) = self.timestamp {
            session.timestamp = timestamp;
        }
        if let Some(score) = self.score {
            session.score = Some(score);
        }
        if let Some(total_questions) = self.total_questions {
            session.total_questions = total_questions;
        }
        if let Some(questions) = self.questions {
            session.questions = Some(questions);
        }
        if let Some(answers) = self.answers {
            session.answers = Some(answers);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_session() -> QuizSession {
        QuizSession {
            id: 1,
            topic_id: Some("photosynthesis".to_string()),
            topic: "Photosynthesis".to_string(),
            grade_level: Some("middle school".to_string()),
            timestamp: 1_700_000_000_000,
            score: Some(3),
            total_questions: 5,
            questions: Some(vec![Question::new(
                "What do plants absorb from the air?",
                vec!["Oxygen".to_string(), "Carbon dioxide".to_string()],
                1,
            )]),
            answers: Some(vec![Some(1)]),
            is_sample: false,
        }
    }

    #[test]
    fn test_patch_merges_only_given_fields() {
        let mut session = sample_session();
        let patch = SessionPatch {
            score: Some(5),
            ..Default::default()
        };

        patch.apply(&mut session);

        assert_eq!(session.score, Some(5));
        assert_eq!(session.topic, "Photosynthesis");
        assert_eq!(session.timestamp, 1_700_000_000_000);
        assert!(session.questions.is_some());
    }

    #[test]
    fn test_can_replay_requires_questions() {
        let mut session = sample_session();
        assert!(session.can_replay());

        session.questions = None;
        assert!(!session.can_replay());

        session.questions = Some(Vec::new());
        assert!(!session.can_replay());
    }
}
