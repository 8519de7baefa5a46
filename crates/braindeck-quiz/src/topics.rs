//! Topic repository
//!
//! Keyed CRUD over topic records. Upserts replace the whole record;
//! there is no partial merge for topics.

use rusqlite::OptionalExtension;

use braindeck_storage::Database;

use crate::models::Topic;
use crate::Result;

pub struct TopicStore {
    db: Database,
}

impl TopicStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Upsert by id. A save with an existing id replaces the prior record
    /// wholesale (last write wins).
    pub fn save_topic(&self, topic: &Topic) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute(
                "INSERT OR REPLACE INTO topics
                 (id, name, grade_level, created_at, last_practiced, total_questions, correct_answers)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                rusqlite::params![
                    topic.id,
                    topic.name,
                    topic.grade_level,
                    topic.created_at,
                    topic.last_practiced,
                    topic.total_questions,
                    topic.correct_answers,
                ],
            )?;
            Ok(())
        })?;

        tracing::debug!(topic_id = %topic.id, "Saved topic");

        Ok(())
    }

    pub fn get_topic(&self, id: &str) -> Result<Option<Topic>> {
        let topic = self.db.with_connection(|conn| {
            let topic = conn
                .query_row(
                    "SELECT id, name, grade_level, created_at, last_practiced,
                            total_questions, correct_answers
                     FROM topics WHERE id = ?1",
                    [id],
                    row_to_topic,
                )
                .optional()?;
            Ok(topic)
        })?;

        Ok(topic)
    }

    /// Every stored topic; ordering is unspecified and used for aggregate
    /// display only.
    pub fn get_all_topics(&self) -> Result<Vec<Topic>> {
        let topics = self.db.with_connection(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, name, grade_level, created_at, last_practiced,
                        total_questions, correct_answers
                 FROM topics",
            )?;

            let topics: Vec<Topic> = stmt
                .query_map([], row_to_topic)?
                .filter_map(|r| r.ok())
                .collect();

            Ok(topics)
        })?;

        Ok(topics)
    }

    pub fn delete_topic(&self, id: &str) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM topics WHERE id = ?1", [id])?;
            Ok(())
        })?;

        tracing::debug!(topic_id = %id, "Deleted topic");

        Ok(())
    }

    pub fn delete_all_topics(&self) -> Result<()> {
        self.db.with_connection(|conn| {
            conn.execute("DELETE FROM topics", [])?;
            Ok(())
        })?;

        Ok(())
    }
}

fn row_to_topic(row: &rusqlite::Row) -> rusqlite::Result<Topic> {
    Ok(Topic {
        id: row.get(0)?,
        name: row.get(1)?,
        grade_level: row.get(2)?,
        created_at: row.get(3)?,
        last_practiced: row.get(4)?,
        total_questions: row.get(5)?,
        correct_answers: row.get(6)?,
    })
}

impl Clone for TopicStore {
    fn clone(&self) -> Self {
        Self {
            db: self.db.clone(),
        }
    }
}
