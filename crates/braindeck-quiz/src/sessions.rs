//! Session repository
//!
//! CRUD plus the domain queries over quiz attempts: auto-assigned ids,
//! recency-ordered listing, shallow-merge partial update (replay), and
//! the per-question explanation cache.

use rusqlite::OptionalExtension;

use braindeck_storage::Database;

use crate::models::{NewSession, QuizSession, SessionPatch};
use crate::Result;

pub struct SessionStore {
    db: Database,
}

impl SessionStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Persist a new session and return its store-assigned id.
    ///
    /// Ids come from the sessions table's AUTOINCREMENT counter, so they
    /// stay strictly increasing and collision-free across restarts.
    pub fn save_session(&self, session: &NewSession) -> Result<i64> {
        let questions_json = session
            .questions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let answers_json = session
            .answers
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        let id = self.db.with_connection(|conn| {
            conn.execute(
                "INSERT INTO sessions
                 (topic_id, topic, grade_level, timestamp, score, total_questions,
                  questions, answers, is_sample)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                rusqlite::params![
                    session.topic_id,
                    session.topic,
                    session.grade_level,
                    session.timestamp,
                    session.score,
                    session.total_questions,
                    questions_json,
                    answers_json,
                    session.is_sample as i32,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        tracing::info!(session_id = id, topic = %session.topic, "Saved quiz session");

        Ok(id)
    }

    pub fn get_session(&self, id: i64) -> Result<Option<QuizSession>> {
        let session = self.db.with_connection(|conn| {
            let session = conn
                .query_row(
                    &format!("{SELECT_SESSION} WHERE id = ?1"),
                    [id],
                    row_to_session,
                )
                .optional()?;
            Ok(session)
        })?;

        Ok(session)
    }

    /// Every stored session, samples included.
    pub fn get_all_sessions(&self) -> Result<Vec<QuizSession>> {
        self.query_sessions(SELECT_SESSION, &[])
    }

    /// Equality filter on the topic index; an unknown topic yields an
    /// empty list, not an error.
    pub fn get_sessions_by_topic(&self, topic_id: &str) -> Result<Vec<QuizSession>> {
        self.query_sessions(
            &format!("{SELECT_SESSION} WHERE topic_id = ?1"),
            &[&topic_id],
        )
    }

    /// Up to `limit` sessions, most recent first. Equal timestamps break
    /// by id descending so the order is stable for a given store state.
    pub fn get_recent_sessions(&self, limit: usize) -> Result<Vec<QuizSession>> {
        self.query_sessions(
            &format!("{SELECT_SESSION} ORDER BY timestamp DESC, id DESC LIMIT ?1"),
            &[&(limit as i64)],
        )
    }

    /// Shallow-merge `patch` over the stored record and persist.
    ///
    /// Returns `Ok(None)` without creating anything when the id is
    /// unknown. This is the replay path: score, answers and timestamp are
    /// rewritten on the existing session rather than creating a new one.
    pub fn update_session(&self, id: i64, patch: SessionPatch) -> Result<Option<QuizSession>> {
        let Some(mut session) = self.get_session(id)? else {
            return Ok(None);
        };

        patch.apply(&mut session);
        self.persist(&session)?;

        tracing::debug!(session_id = id, "Updated quiz session");

        Ok(Some(session))
    }

    /// Cache a correct-answer explanation on one question of a session.
    ///
    /// Returns `Ok(None)` when the session is unknown, carries no
    /// question set, or the index is out of range. Sibling questions and
    /// the rest of the target question are preserved untouched.
    pub fn update_question_explanation(
        &self,
        id: i64,
        question_index: usize,
        explanation: &str,
    ) -> Result<Option<QuizSession>> {
        let Some(mut session) = self.get_session(id)? else {
            return Ok(None);
        };

        let Some(questions) = session.questions.as_mut() else {
            return Ok(None);
        };
        let Some(question) = questions.get_mut(question_index) else {
            return Ok(None);
        };

        question.right_answer_explanation = Some(explanation.to_string());
        self.persist(&session)?;

        Ok(Some(session))
    }

    /// Delete every seeded sample session; a no-op when none exist.
    pub fn delete_sample_sessions(&self) -> Result<usize> {
        let removed = self.db.with_connection(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE is_sample = 1", [])?;
            Ok(removed)
        })?;

        if removed > 0 {
            tracing::info!(removed, "Deleted sample sessions");
        }

        Ok(removed)
    }

    /// Delete every non-sample session (privacy wipe helper).
    pub fn delete_user_sessions(&self) -> Result<usize> {
        let removed = self.db.with_connection(|conn| {
            let removed = conn.execute("DELETE FROM sessions WHERE is_sample = 0", [])?;
            Ok(removed)
        })?;

        Ok(removed)
    }

    fn persist(&self, session: &QuizSession) -> Result<()> {
        let questions_json = session
            .questions
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let answers_json = session
            .answers
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;

        self.db.with_connection(|conn| {
            conn.execute(
                "UPDATE sessions
                 SET topic_id = ?1, topic = ?2, grade_level = ?3, timestamp = ?4,
                     score = ?5, total_questions = ?6, questions = ?7, answers = ?8,
                     is_sample = ?9
                 WHERE id = ?10",
                rusqlite::params![
                    session.topic_id,
                    session.topic,
                    session.grade_level,
                    session.timestamp,
                    session.score,
                    session.total_questions,
                    questions_json,
                    answers_json,
                    session.is_sample as i32,
                    session.id,
                ],
            )?;
            Ok(())
        })?;

        Ok(())
    }

    fn query_sessions(
        &self,
        sql: &str,
        params: &[&dyn rusqlite::ToSql],
    ) -> Result<Vec<QuizSession>> {
        let sessions = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(sql)?;

            let sessions: Vec<QuizSession> = stmt
                .query_map(params, row_to_session)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(sessions)
        })?;

        Ok(sessions)
    }
}

const SELECT_SESSION: &str = "SELECT id, topic_id, topic, grade_level, timestamp, score,
        total_questions, questions, answers, is_sample FROM sessions";

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<QuizSession> {
    let questions_json: Option<String> = row.get(7)?;
    let answers_json: Option<String> = row.get(8)?;

    Ok(QuizSession {
        id: row.get(0)?,
        topic_id: row.get(1)?,
        topic: row.get(2)?,
        grade_level: row.get(3)?,
        timestamp: row.get(4)?,
        score: row.get(5)?,
        total_questions: row.get(6)?,
        questions: questions_json.and_then(|json| serde_json::from_str(&json).ok()),
        answers: answers_json.and_then(|json| serde_json::from_str(&json).ok()),
        is_sample: row.get::<_, i32>(9)? != 0,
    })
}

impl Clone for SessionStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Question;

    fn new_session(topic: &str, timestamp: i64) -> NewSession {
        NewSession {
            topic_id: Some(topic.to_lowercase().replace(' ', "-")),
            topic: topic.to_string(),
            grade_level: Some("middle school".to_string()),
            timestamp,
            score: Some(2),
            total_questions: 3,
            questions: Some(vec![
                Question::new(
                    "Which planet is closest to the sun?",
                    vec!["Venus".to_string(), "Mercury".to_string()],
                    1,
                ),
                Question::new(
                    "Which planet is known as the red planet?",
                    vec!["Mars".to_string(), "Jupiter".to_string()],
                    0,
                ),
            ]),
            answers: Some(vec![Some(1), Some(0)]),
            is_sample: false,
        }
    }

    fn store() -> SessionStore {
        SessionStore::new(Database::open_in_memory().unwrap())
    }

    #[test]
    fn test_ids_are_strictly_increasing() {
        let store = store();

        let mut last = 0;
        for i in 0..5 {
            let id = store.save_session(&new_session("Space", i)).unwrap();
            assert!(id > last);
            last = id;
        }
    }

    #[test]
    fn test_ids_survive_deletion() {
        let store = store();

        let first = store.save_session(&new_session("Space", 1)).unwrap();
        store.delete_user_sessions().unwrap();

        // AUTOINCREMENT must not hand the deleted id back out
        let second = store.save_session(&new_session("Space", 2)).unwrap();
        assert!(second > first);
    }

    #[test]
    fn test_get_session_round_trip() {
        let store = store();

        let saved = new_session("Chemistry", 42);
        let id = store.save_session(&saved).unwrap();

        let loaded = store.get_session(id).unwrap().unwrap();
        assert_eq!(loaded.topic, "Chemistry");
        assert_eq!(loaded.timestamp, 42);
        assert_eq!(loaded.questions, saved.questions);
        assert_eq!(loaded.answers, saved.answers);
        assert!(!loaded.is_sample);

        assert!(store.get_session(id + 100).unwrap().is_none());
    }

    #[test]
    fn test_recent_sessions_order_and_limit() {
        let store = store();

        let id1 = store.save_session(&new_session("A", 100)).unwrap();
        let id2 = store.save_session(&new_session("B", 300)).unwrap();
        let id3 = store.save_session(&new_session("C", 200)).unwrap();

        let recent = store.get_recent_sessions(3).unwrap();
        let ids: Vec<i64> = recent.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![id2, id3, id1]);

        let limited = store.get_recent_sessions(2).unwrap();
        assert_eq!(limited.len(), 2);
        assert_eq!(limited[0].id, id2);
    }

    #[test]
    fn test_recent_sessions_tie_break_is_deterministic() {
        let store = store();

        let id1 = store.save_session(&new_session("A", 500)).unwrap();
        let id2 = store.save_session(&new_session("B", 500)).unwrap();

        // Equal timestamps: higher id (later insert) first
        let recent = store.get_recent_sessions(10).unwrap();
        let ids: Vec<i64> = recent.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![id2, id1]);
    }

    #[test]
    fn test_sessions_by_topic() {
        let store = store();

        store.save_session(&new_session("Space", 1)).unwrap();
        store.save_session(&new_session("Space", 2)).unwrap();
        store.save_session(&new_session("History", 3)).unwrap();

        let space = store.get_sessions_by_topic("space").unwrap();
        assert_eq!(space.len(), 2);
        assert!(space.iter().all(|s| s.topic_id.as_deref() == Some("space")));

        assert!(store.get_sessions_by_topic("geology").unwrap().is_empty());
    }

    #[test]
    fn test_update_session_merges() {
        let store = store();
        let id = store.save_session(&new_session("Space", 10)).unwrap();

        let updated = store
            .update_session(
                id,
                SessionPatch {
                    score: Some(5),
                    timestamp: Some(999),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.score, Some(5));
        assert_eq!(updated.timestamp, 999);
        // Unspecified fields untouched
        assert_eq!(updated.topic, "Space");
        assert_eq!(updated.total_questions, 3);
        assert!(updated.questions.is_some());

        // And the merge was persisted
        let reloaded = store.get_session(id).unwrap().unwrap();
        assert_eq!(reloaded, updated);
    }

    #[test]
    fn test_update_missing_session_creates_nothing() {
        let store = store();

        let result = store
            .update_session(
                77,
                SessionPatch {
                    score: Some(1),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(result.is_none());
        assert!(store.get_all_sessions().unwrap().is_empty());
    }

    #[test]
    fn test_update_question_explanation() {
        let store = store();
        let id = store.save_session(&new_session("Space", 10)).unwrap();

        let updated = store
            .update_question_explanation(id, 1, "Iron oxide dust colors the surface.")
            .unwrap()
            .unwrap();

        let questions = updated.questions.as_ref().unwrap();
        assert_eq!(
            questions[1].right_answer_explanation.as_deref(),
            Some("Iron oxide dust colors the surface.")
        );
        // Sibling question untouched
        assert_eq!(questions[0].right_answer_explanation, None);
        // Other fields of the target question untouched
        assert_eq!(questions[1].prompt, "Which planet is known as the red planet?");
        assert_eq!(questions[1].options.len(), 2);
    }

    #[test]
    fn test_update_question_explanation_bounds() {
        let store = store();
        let id = store.save_session(&new_session("Space", 10)).unwrap();

        // Index == questions.len() is out of range
        assert!(store
            .update_question_explanation(id, 2, "nope")
            .unwrap()
            .is_none());

        // Unknown session
        assert!(store
            .update_question_explanation(id + 5, 0, "nope")
            .unwrap()
            .is_none());

        // Session without questions
        let bare = NewSession {
            questions: None,
            ..new_session("Bare", 1)
        };
        let bare_id = store.save_session(&bare).unwrap();
        assert!(store
            .update_question_explanation(bare_id, 0, "nope")
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_delete_sample_sessions_only() {
        let store = store();

        store.save_session(&new_session("User", 1)).unwrap();
        let sample = NewSession {
            is_sample: true,
            ..new_session("Sample", 0)
        };
        store.save_session(&sample).unwrap();

        // No-op when run twice
        assert_eq!(store.delete_sample_sessions().unwrap(), 1);
        assert_eq!(store.delete_sample_sessions().unwrap(), 0);

        let remaining = store.get_all_sessions().unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].topic, "User");
    }
}
