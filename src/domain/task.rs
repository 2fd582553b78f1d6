//! Task read model and partial-update description
//!
//! `TaskRow` is what `TaskStore::query` hands back: the stored task
//! joined with its project's display name. `TaskPatch` describes a
//! partial update; only the fields that are `Some` get written, all
//! within one transaction.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::id::{ProjectId, TaskId};

/// A task as returned from the store, joined with its project name
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRow {
    /// Stable identifier assigned on creation
    pub id: TaskId,

    /// Human-readable title
    pub title: String,

    /// When the task was created (immutable)
    pub created_at: DateTime<Utc>,

    /// Optional due instant
    pub due_at: Option<DateTime<Utc>>,

    /// Whether the task has been marked resolved
    pub resolved: bool,

    /// Display name of the referenced project, if any
    pub project: Option<String>,
}

impl TaskRow {
    /// Returns the project display name or an empty string for rendering
    pub fn project_label(&self) -> &str {
        self.project.as_deref().unwrap_or("")
    }
}

/// Fields to change on an existing task
///
/// Unset fields are left untouched by `TaskStore::update`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub due_at: Option<DateTime<Utc>>,
    pub resolved: Option<bool>,
    pub project: Option<ProjectId>,
}

impl TaskPatch {
    /// Returns true if the patch would change nothing
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.due_at.is_none()
            && self.resolved.is_none()
            && self.project.is_none()
    }
}
