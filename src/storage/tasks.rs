//! Task persistence
//!
//! Owns the tasks table. Every mutating operation is a single
//! transaction: it commits whole or rolls back leaving nothing behind.
//! Operations on unknown ids affect zero rows and report that count
//! instead of failing; the caller decides how to present it.

use chrono::{DateTime, TimeZone, Utc};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection};

use super::{StoreError, StoreResult};
use crate::domain::{ProjectId, TaskId, TaskPatch, TaskRow};

/// SQLite-backed task store
pub struct TaskStore<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> TaskStore<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Creates a task and returns its assigned id.
    ///
    /// The row is inserted with all fields in one transaction; a
    /// failure leaves no task behind.
    pub fn create(
        &mut self,
        title: &str,
        created_at: DateTime<Utc>,
        due_at: Option<DateTime<Utc>>,
        project: ProjectId,
    ) -> StoreResult<TaskId> {
        if title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }

        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO tasks (project_id, title, created_at, due_at, resolved)
             VALUES (?1, ?2, ?3, ?4, 0)",
            params![
                project.as_i64(),
                title,
                created_at.timestamp(),
                due_at.map(|d| d.timestamp()),
            ],
        )?;
        let id = TaskId::new(tx.last_insert_rowid());
        tx.commit()?;

        Ok(id)
    }

    /// Applies the provided fields of a patch atomically.
    ///
    /// Returns the number of rows affected: zero for an unknown id,
    /// which is not an error. An empty patch writes nothing.
    pub fn update(&mut self, id: TaskId, patch: &TaskPatch) -> StoreResult<usize> {
        if patch.is_empty() {
            return Ok(0);
        }

        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Value> = Vec::new();

        if let Some(title) = &patch.title {
            if title.trim().is_empty() {
                return Err(StoreError::EmptyTitle);
            }
            sets.push("title = ?");
            values.push(Value::Text(title.clone()));
        }
        if let Some(due) = patch.due_at {
            sets.push("due_at = ?");
            values.push(Value::Integer(due.timestamp()));
        }
        if let Some(resolved) = patch.resolved {
            sets.push("resolved = ?");
            values.push(Value::Integer(i64::from(resolved)));
        }
        if let Some(project) = patch.project {
            sets.push("project_id = ?");
            values.push(Value::Integer(project.as_i64()));
        }

        let sql = format!("UPDATE tasks SET {} WHERE id = ?", sets.join(", "));
        values.push(Value::Integer(id.as_i64()));

        let tx = self.conn.transaction()?;
        let changed = tx.execute(&sql, params_from_iter(values))?;
        tx.commit()?;

        Ok(changed)
    }

    /// Marks a task resolved. Idempotent: resolving an already-resolved
    /// task is a no-op success.
    pub fn mark_resolved(&mut self, id: TaskId) -> StoreResult<usize> {
        let changed = self.conn.execute(
            "UPDATE tasks SET resolved = 1 WHERE id = ?1",
            [id.as_i64()],
        )?;
        Ok(changed)
    }

    /// Deletes a task permanently. The caller is responsible for any
    /// confirmation beforehand. Unknown ids delete zero rows.
    pub fn delete(&mut self, id: TaskId) -> StoreResult<usize> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", [id.as_i64()])?;
        Ok(changed)
    }

    /// Returns tasks in storage (insertion) order, each joined with
    /// its project's display name. Resolved tasks are excluded unless
    /// requested.
    pub fn query(&self, include_resolved: bool) -> StoreResult<Vec<TaskRow>> {
        let sql = if include_resolved {
            "SELECT t.id, t.title, t.created_at, t.due_at, t.resolved, p.name
             FROM tasks t LEFT JOIN projects p ON p.id = t.project_id
             ORDER BY t.id"
        } else {
            "SELECT t.id, t.title, t.created_at, t.due_at, t.resolved, p.name
             FROM tasks t LEFT JOIN projects p ON p.id = t.project_id
             WHERE t.resolved = 0
             ORDER BY t.id"
        };

        let mut stmt = self.conn.prepare(sql)?;
        let raw: Vec<(i64, String, i64, Option<i64>, i64, Option<String>)> = stmt
            .query_map([], |row| {
                Ok((
                    row.get(0)?,
                    row.get(1)?,
                    row.get(2)?,
                    row.get(3)?,
                    row.get(4)?,
                    row.get(5)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        raw.into_iter()
            .map(|(id, title, created, due, resolved, project)| {
                Ok(TaskRow {
                    id: TaskId::new(id),
                    title,
                    created_at: instant(created)?,
                    due_at: due.map(instant).transpose()?,
                    resolved: resolved != 0,
                    project,
                })
            })
            .collect()
    }
}

/// Converts stored epoch seconds back to an instant
fn instant(secs: i64) -> StoreResult<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| StoreError::InvalidData(format!("timestamp {secs} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::db;
    use crate::storage::projects::ProjectDirectory;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap()
    }

    #[test]
    fn create_assigns_sequential_ids_with_defaults() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let first = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();
        let second = store
            .create("Walk dog", now(), None, ProjectId::NONE)
            .unwrap();

        assert_eq!(first, TaskId::new(1));
        assert_eq!(second, TaskId::new(2));

        let rows = store.query(false).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Buy milk");
        assert!(!rows[0].resolved);
        assert!(rows[0].due_at.is_none());
        assert!(rows[0].project.is_none());
        assert_eq!(rows[0].created_at, now());
    }

    #[test]
    fn create_rejects_empty_title() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let result = store.create("   ", now(), None, ProjectId::NONE);
        assert!(matches!(result, Err(StoreError::EmptyTitle)));
        assert!(store.query(true).unwrap().is_empty());
    }

    #[test]
    fn query_joins_project_name() {
        let mut conn = db::open_in_memory().unwrap();

        let project = {
            let mut dir = ProjectDirectory::new(&mut conn);
            dir.resolve_or_create("home").unwrap().applied()
        };

        let mut store = TaskStore::new(&mut conn);
        store.create("Buy milk", now(), None, project).unwrap();
        store
            .create("Review PR", now(), None, ProjectId::NONE)
            .unwrap();

        let rows = store.query(false).unwrap();
        assert_eq!(rows[0].project.as_deref(), Some("home"));
        assert!(rows[1].project.is_none());
    }

    #[test]
    fn update_touches_only_provided_fields() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let due = now();
        let id = store
            .create("Buy milk", now(), Some(due), ProjectId::NONE)
            .unwrap();

        let patch = TaskPatch {
            title: Some("Buy oat milk".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(id, &patch).unwrap(), 1);

        let rows = store.query(false).unwrap();
        assert_eq!(rows[0].title, "Buy oat milk");
        assert_eq!(rows[0].due_at, Some(due));
        assert!(!rows[0].resolved);
    }

    #[test]
    fn update_applies_all_fields_together() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let id = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();

        let due = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();
        let patch = TaskPatch {
            title: Some("Buy bread".to_string()),
            due_at: Some(due),
            resolved: Some(true),
            project: None,
        };
        assert_eq!(store.update(id, &patch).unwrap(), 1);

        let rows = store.query(true).unwrap();
        assert_eq!(rows[0].title, "Buy bread");
        assert_eq!(rows[0].due_at, Some(due));
        assert!(rows[0].resolved);
    }

    #[test]
    fn update_unknown_id_affects_zero_rows() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let patch = TaskPatch {
            title: Some("Ghost".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(TaskId::new(99), &patch).unwrap(), 0);
    }

    #[test]
    fn empty_patch_writes_nothing() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let id = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();
        assert_eq!(store.update(id, &TaskPatch::default()).unwrap(), 0);
        assert_eq!(store.query(false).unwrap()[0].title, "Buy milk");
    }

    #[test]
    fn mark_resolved_is_idempotent() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let id = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();

        assert_eq!(store.mark_resolved(id).unwrap(), 1);
        assert_eq!(store.mark_resolved(id).unwrap(), 1);

        let rows = store.query(true).unwrap();
        assert_eq!(rows.len(), 1);
        assert!(rows[0].resolved);
    }

    #[test]
    fn resolved_tasks_are_excluded_by_default_but_addressable() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let first = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();
        store.create("Walk dog", now(), None, ProjectId::NONE).unwrap();
        store.mark_resolved(first).unwrap();

        let open = store.query(false).unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "Walk dog");

        let all = store.query(true).unwrap();
        assert_eq!(all.len(), 2);

        // Still addressable for further mutation
        let patch = TaskPatch {
            title: Some("Buy milk (again)".to_string()),
            ..Default::default()
        };
        assert_eq!(store.update(first, &patch).unwrap(), 1);
    }

    #[test]
    fn delete_unknown_id_is_not_an_error() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        assert_eq!(store.delete(TaskId::new(42)).unwrap(), 0);
    }

    #[test]
    fn delete_removes_the_row_permanently() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let id = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();
        assert_eq!(store.delete(id).unwrap(), 1);
        assert!(store.query(true).unwrap().is_empty());
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut conn = db::open_in_memory().unwrap();
        let mut store = TaskStore::new(&mut conn);

        let first = store
            .create("Buy milk", now(), None, ProjectId::NONE)
            .unwrap();
        store.delete(first).unwrap();

        let second = store
            .create("Walk dog", now(), None, ProjectId::NONE)
            .unwrap();
        assert!(second > first);
    }
}
