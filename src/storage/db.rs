//! Connection bootstrap and schema management
//!
//! The process opens one connection at startup and passes it down to
//! the store types; tests use the in-memory constructor for isolation.
//! Schema creation is gated on `PRAGMA user_version` so reopening an
//! existing database is a no-op.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Bump when the schema changes. Databases with a newer version than
/// this binary understands are refused rather than clobbered.
const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = "
CREATE TABLE tasks (
    id         INTEGER PRIMARY KEY AUTOINCREMENT,
    project_id INTEGER NOT NULL DEFAULT 0,
    title      TEXT NOT NULL,
    created_at INTEGER NOT NULL,
    due_at     INTEGER,
    resolved   INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE projects (
    id   INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL
);

CREATE INDEX idx_tasks_resolved ON tasks(resolved);
CREATE INDEX idx_tasks_project ON tasks(project_id);
";

/// Opens the task database at the given path, creating it (and its
/// parent directory) on first use.
pub fn open(path: &Path) -> Result<Connection> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory: {}", parent.display())
            })?;
        }
    }

    let conn = Connection::open(path)
        .with_context(|| format!("Failed to open task database: {}", path.display()))?;

    bootstrap(conn)
}

/// Opens an isolated in-memory database (used by tests)
pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
    bootstrap(conn)
}

fn bootstrap(conn: Connection) -> Result<Connection> {
    conn.busy_timeout(Duration::from_secs(5))?;
    ensure_schema(&conn)?;
    Ok(conn)
}

fn ensure_schema(conn: &Connection) -> Result<()> {
    let version = schema_version(conn)?;

    match version {
        0 => {
            conn.execute_batch(SCHEMA)?;
            conn.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION}"))?;
            Ok(())
        }
        v if v == SCHEMA_VERSION => Ok(()),
        v => anyhow::bail!(
            "Task database has schema version {v}, but this build supports {SCHEMA_VERSION}"
        ),
    }
}

fn schema_version(conn: &Connection) -> Result<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;
    Ok(version)
}
