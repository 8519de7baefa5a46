//! Database migrations
//!
//! Schema version 1: topics, sessions, settings.

use crate::Result;
use rusqlite::Connection;

const SCHEMA_VERSION: i32 = 1;

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current_version = get_schema_version(conn)?;

    if current_version < 1 {
        tracing::info!("Running migration v1: Initial schema");
    }

    // v1 creation is IF NOT EXISTS throughout and re-runs on every open.
    // The version row alone is not trusted: a store left half-created by
    // an interrupted upgrade heals here, collection by collection.
    migrate_v1(conn)?;

    if current_version < SCHEMA_VERSION {
        set_schema_version(conn, SCHEMA_VERSION)?;
    }
    Ok(())
}

fn get_schema_version(conn: &Connection) -> Result<i32> {
    let result: std::result::Result<i32, _> =
        conn.query_row("SELECT version FROM schema_version LIMIT 1", [], |row| {
            row.get(0)
        });

    match result {
        Ok(v) => Ok(v),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(rusqlite::Error::SqliteFailure(_, _)) => {
            // Table doesn't exist yet
            conn.execute(
                "CREATE TABLE IF NOT EXISTS schema_version (version INTEGER NOT NULL)",
                [],
            )?;
            conn.execute("INSERT INTO schema_version (version) VALUES (0)", [])?;
            Ok(0)
        }
        Err(e) => Err(e.into()),
    }
}

fn set_schema_version(conn: &Connection, version: i32) -> Result<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute(
        "INSERT INTO schema_version (version) VALUES (?1)",
        [version],
    )?;
    Ok(())
}

fn migrate_v1(conn: &Connection) -> Result<()> {
    // Topics table - keyed by a caller-chosen string id
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS topics (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            grade_level TEXT,
            created_at INTEGER,
            last_practiced INTEGER,
            total_questions INTEGER NOT NULL DEFAULT 0,
            correct_answers INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_topics_name ON topics(name);
    "#,
    )?;

    // Sessions table - one row per quiz attempt. AUTOINCREMENT keeps the
    // id counter in sqlite_sequence, so ids stay strictly increasing and
    // are never reused across process restarts.
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            topic_id TEXT,
            topic TEXT NOT NULL DEFAULT '',
            grade_level TEXT,
            timestamp INTEGER NOT NULL DEFAULT 0,
            score INTEGER,
            total_questions INTEGER NOT NULL DEFAULT 0,
            questions TEXT,
            answers TEXT,
            is_sample INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_sessions_topic ON sessions(topic_id);
        CREATE INDEX IF NOT EXISTS idx_sessions_timestamp ON sessions(timestamp);
    "#,
    )?;

    // Settings table
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS settings (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        );
    "#,
    )?;

    Ok(())
}
