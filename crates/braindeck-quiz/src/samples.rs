//! Sample quiz bootstrap
//!
//! Seeds a versioned bundle of read-only sample sessions on first run or
//! on version bump. The order is delete, insert, stamp: if the process
//! dies mid-load, the stale version token makes the next start redo the
//! whole (idempotent) load instead of trusting a half-populated bundle.

use serde::{Deserialize, Serialize};

use crate::models::{NewSession, Question};
use crate::sessions::SessionStore;
use crate::settings::SettingsStore;
use crate::Result;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleQuiz {
    pub topic: String,
    pub grade_level: String,
    pub total_questions: i64,
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SampleBundle {
    /// Opaque token compared by equality against the stored one
    pub version: String,
    pub quizzes: Vec<SampleQuiz>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Stored version matches the bundle; nothing was written
    AlreadyCurrent,
    Loaded { loaded: usize, failed: usize },
}

pub struct SampleLoader {
    sessions: SessionStore,
    settings: SettingsStore,
}

impl SampleLoader {
    pub fn new(sessions: SessionStore, settings: SettingsStore) -> Self {
        Self { sessions, settings }
    }

    /// Runs on every app start; the common path is a single setting read.
    pub fn load_if_needed(&self, bundle: &SampleBundle) -> Result<LoadOutcome> {
        let stored = self.settings.get_samples_version()?;
        if stored.as_deref() == Some(bundle.version.as_str()) {
            return Ok(LoadOutcome::AlreadyCurrent);
        }

        self.sessions.delete_sample_sessions()?;

        let mut loaded = 0;
        let mut failed = 0;
        for quiz in &bundle.quizzes {
            // Samples sort last under recency ordering (timestamp 0) and
            // carry no score or answers until the user replays them.
            let session = NewSession {
                topic_id: None,
                topic: quiz.topic.clone(),
                grade_level: Some(quiz.grade_level.clone()),
                timestamp: 0,
                score: None,
                total_questions: quiz.total_questions,
                questions: Some(quiz.questions.clone()),
                answers: None,
                is_sample: true,
            };

            match self.sessions.save_session(&session) {
                Ok(_) => loaded += 1,
                Err(e) => {
                    // One bad definition must not sink the batch
                    tracing::warn!(topic = %quiz.topic, error = %e, "Failed to seed sample quiz");
                    failed += 1;
                }
            }
        }

        self.settings.set_samples_version(&bundle.version)?;

        tracing::info!(version = %bundle.version, loaded, failed, "Loaded sample quiz bundle");

        Ok(LoadOutcome::Loaded { loaded, failed })
    }
}

impl Clone for SampleLoader {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            settings: self.settings.clone(),
        }
    }
}

/// The sample content shipped with the app.
pub fn default_bundle() -> SampleBundle {
    SampleBundle {
        version: "2024.2".to_string(),
        quizzes: vec![
            SampleQuiz {
                topic: "The Solar System".to_string(),
                grade_level: "elementary".to_string(),
                total_questions: 3,
                questions: vec![
                    Question::new(
                        "Which planet is closest to the Sun?",
                        vec![
                            "Venus".to_string(),
                            "Mercury".to_string(),
                            "Mars".to_string(),
                            "Earth".to_string(),
                        ],
                        1,
                    ),
                    Question::new(
                        "What is the largest planet in the solar system?",
                        vec![
                            "Saturn".to_string(),
                            "Neptune".to_string(),
                            "Jupiter".to_string(),
                            "Uranus".to_string(),
                        ],
                        2,
                    ),
                    Question::new(
                        "How many moons does Earth have?",
                        vec![
                            "None".to_string(),
                            "One".to_string(),
                            "Two".to_string(),
                            "Four".to_string(),
                        ],
                        1,
                    ),
                ],
            },
            SampleQuiz {
                topic: "World Capitals".to_string(),
                grade_level: "middle school".to_string(),
                total_questions: 3,
                questions: vec![
                    Question::new(
                        "What is the capital of Australia?",
                        vec![
                            "Sydney".to_string(),
                            "Melbourne".to_string(),
                            "Canberra".to_string(),
                            "Perth".to_string(),
                        ],
                        2,
                    ),
                    Question::new(
                        "What is the capital of Canada?",
                        vec![
                            "Toronto".to_string(),
                            "Ottawa".to_string(),
                            "Vancouver".to_string(),
                            "Montreal".to_string(),
                        ],
                        1,
                    ),
                    Question::new(
                        "What is the capital of Japan?",
                        vec![
                            "Osaka".to_string(),
                            "Kyoto".to_string(),
                            "Tokyo".to_string(),
                            "Nagoya".to_string(),
                        ],
                        2,
                    ),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use braindeck_storage::Database;

    fn loader() -> SampleLoader {
        let db = Database::open_in_memory().unwrap();
        SampleLoader::new(
            SessionStore::new(db.clone()),
            SettingsStore::new(db),
        )
    }

    fn bundle(version: &str) -> SampleBundle {
        SampleBundle {
            version: version.to_string(),
            quizzes: vec![SampleQuiz {
                topic: "Fractions".to_string(),
                grade_level: "elementary".to_string(),
                total_questions: 1,
                questions: vec![Question::new(
                    "What is 1/2 + 1/4?",
                    vec!["1/6".to_string(), "3/4".to_string()],
                    1,
                )],
            }],
        }
    }

    #[test]
    fn test_first_load_seeds_sessions() {
        let loader = loader();

        let outcome = loader.load_if_needed(&bundle("v1")).unwrap();
        assert_eq!(outcome, LoadOutcome::Loaded { loaded: 1, failed: 0 });

        let sessions = loader.sessions.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        let sample = &sessions[0];
        assert!(sample.is_sample);
        assert_eq!(sample.timestamp, 0);
        assert_eq!(sample.score, None);
        assert_eq!(sample.answers, None);
        assert_eq!(sample.topic, "Fractions");
    }

    #[test]
    fn test_second_load_is_a_no_op() {
        let loader = loader();

        loader.load_if_needed(&bundle("v1")).unwrap();
        let first_ids: Vec<i64> = loader
            .sessions
            .get_all_sessions()
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();

        let outcome = loader.load_if_needed(&bundle("v1")).unwrap();
        assert_eq!(outcome, LoadOutcome::AlreadyCurrent);

        // No writes happened: same rows, same ids
        let second_ids: Vec<i64> = loader
            .sessions
            .get_all_sessions()
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn test_version_bump_replaces_bundle() {
        let loader = loader();

        loader.load_if_needed(&bundle("v1")).unwrap();
        let old_ids: Vec<i64> = loader
            .sessions
            .get_all_sessions()
            .unwrap()
            .iter()
            .map(|s| s.id)
            .collect();

        loader.load_if_needed(&bundle("v2")).unwrap();

        let sessions = loader.sessions.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 1);
        // Replaced wholesale, not merged: fresh rows under fresh ids
        assert!(!old_ids.contains(&sessions[0].id));
        assert_eq!(
            loader.settings.get_samples_version().unwrap().as_deref(),
            Some("v2")
        );
    }

    #[test]
    fn test_user_sessions_survive_a_reload() {
        let loader = loader();
        loader.load_if_needed(&bundle("v1")).unwrap();

        let user = NewSession {
            topic: "Mine".to_string(),
            timestamp: 123,
            ..Default::default()
        };
        loader.sessions.save_session(&user).unwrap();

        loader.load_if_needed(&bundle("v2")).unwrap();

        let sessions = loader.sessions.get_all_sessions().unwrap();
        assert_eq!(sessions.len(), 2);
        assert!(sessions.iter().any(|s| s.topic == "Mine" && !s.is_sample));
    }

    #[test]
    fn test_default_bundle_shape() {
        let bundle = default_bundle();
        assert!(!bundle.version.is_empty());
        assert!(!bundle.quizzes.is_empty());
        for quiz in &bundle.quizzes {
            assert_eq!(quiz.total_questions as usize, quiz.questions.len());
            for question in &quiz.questions {
                assert!(question.correct_index < question.options.len());
            }
        }
    }
}
