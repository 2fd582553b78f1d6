//! Task command handlers
//!
//! Each handler parses nothing: it receives typed inputs from the
//! clap layer, drives the domain and storage calls, and renders the
//! outcome. Soft outcomes (ambiguous project, unknown id) print a
//! notice and exit successfully; hard failures propagate as errors.

use std::io::{self, BufRead, Write};

use anyhow::Result;
use chrono::Utc;
use rusqlite::Connection;

use super::output::Output;
use crate::domain::{due, ProjectId, TaskFilter, TaskId, TaskPatch, TaskRow};
use crate::storage::{ProjectDirectory, ProjectMatch, TaskStore};

pub fn list(
    conn: &mut Connection,
    output: &Output,
    include_resolved: bool,
    project: Option<&str>,
) -> Result<()> {
    let rows = TaskStore::new(conn).query(include_resolved)?;
    let filter = TaskFilter::new(None, project)?;
    render_rows(output, &filter.apply(rows));
    Ok(())
}

pub fn find(
    conn: &mut Connection,
    output: &Output,
    pattern: &str,
    project: Option<&str>,
) -> Result<()> {
    let filter = TaskFilter::new(Some(pattern), project)?;
    let rows = TaskStore::new(conn).query(false)?;
    render_rows(output, &filter.apply(rows));
    Ok(())
}

pub fn add(
    conn: &mut Connection,
    output: &Output,
    title: &str,
    due_expr: Option<&str>,
    project_name: Option<&str>,
) -> Result<()> {
    // Resolve the due date and the project before anything is written;
    // a failure here aborts with the store untouched.
    let due = due_expr.map(|e| due::resolve(e, Utc::now())).transpose()?;

    let project = match project_name {
        Some(name) => resolve_project(conn, output, name)?,
        None => ProjectId::NONE,
    };

    let id = TaskStore::new(conn).create(title, Utc::now(), due, project)?;

    if output.is_json() {
        output.data(&serde_json::json!({
            "id": id,
            "title": title,
            "due_at": due,
            "project_id": project,
        }));
    } else {
        output.success(&format!("Task added with id {}", id));
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn change(
    conn: &mut Connection,
    output: &Output,
    id: TaskId,
    title: Option<String>,
    due_expr: Option<&str>,
    project_name: Option<&str>,
    resolved: Option<bool>,
) -> Result<()> {
    if title.is_none() && due_expr.is_none() && project_name.is_none() && resolved.is_none() {
        anyhow::bail!(
            "Nothing to change; pass --title, --due, --project, --resolved or --unresolved"
        );
    }

    let due_at = due_expr.map(|e| due::resolve(e, Utc::now())).transpose()?;

    // Ambiguity drops the project change; other fields still apply.
    let project = match project_name {
        Some(name) => resolve_project_soft(conn, output, name)?,
        None => None,
    };

    let patch = TaskPatch {
        title,
        due_at,
        resolved,
        project,
    };

    if patch.is_empty() {
        // The only requested change was an ambiguous project; nothing
        // to write.
        return Ok(());
    }

    let changed = TaskStore::new(conn).update(id, &patch)?;
    if changed == 0 {
        output.note(&format!("No task with id {}", id));
    } else {
        output.success(&format!("Task {} updated", id));
    }

    Ok(())
}

pub fn resolve(conn: &mut Connection, output: &Output, id: TaskId) -> Result<()> {
    let changed = TaskStore::new(conn).mark_resolved(id)?;
    if changed == 0 {
        output.note(&format!("No task with id {}", id));
    } else {
        output.success(&format!("Task {} marked as resolved", id));
    }

    Ok(())
}

pub fn delete(conn: &mut Connection, output: &Output, id: TaskId, yes: bool) -> Result<()> {
    if !yes && !confirm(&format!("Delete task {}? [y/N] ", id))? {
        output.note("Aborted.");
        return Ok(());
    }

    let changed = TaskStore::new(conn).delete(id)?;
    if changed == 0 {
        output.note(&format!("No task with id {}", id));
    } else {
        output.success("Task deleted");
    }

    Ok(())
}

pub fn projects(conn: &mut Connection, output: &Output) -> Result<()> {
    let projects = ProjectDirectory::new(conn).list()?;

    if output.is_json() {
        let items: Vec<_> = projects
            .iter()
            .map(|(id, name)| serde_json::json!({ "id": id, "name": name }))
            .collect();
        output.data(&items);
    } else if projects.is_empty() {
        println!("No projects");
    } else {
        println!("{:<6} NAME", "ID");
        println!("{}", "-".repeat(30));
        for (id, name) in &projects {
            println!("{:<6} {}", id, name);
        }
        println!();
        println!("Total projects: {}", projects.len());
    }

    Ok(())
}

/// Resolves a project for `add`: ambiguity leaves the task without a
/// project and prints a notice.
fn resolve_project(conn: &mut Connection, output: &Output, name: &str) -> Result<ProjectId> {
    Ok(resolve_project_soft(conn, output, name)?.unwrap_or(ProjectId::NONE))
}

/// Shared lookup: `None` means the name was ambiguous and no project
/// should be applied.
fn resolve_project_soft(
    conn: &mut Connection,
    output: &Output,
    name: &str,
) -> Result<Option<ProjectId>> {
    let matched = ProjectDirectory::new(conn).resolve_or_create(name)?;

    match matched {
        ProjectMatch::Existing(id) => {
            output.verbose_ctx("project", &format!("'{}' resolved to project {}", name, id));
            Ok(Some(id))
        }
        ProjectMatch::Created(id) => {
            output.verbose_ctx("project", &format!("Created project {} '{}'", id, name));
            Ok(Some(id))
        }
        ProjectMatch::Ambiguous => {
            output.note(&format!(
                "'{}' matches more than one project; no project applied",
                name
            ));
            Ok(None)
        }
    }
}

fn render_rows(output: &Output, rows: &[TaskRow]) {
    if output.is_json() {
        output.data(&rows);
        return;
    }

    if rows.is_empty() {
        println!("No tasks");
        return;
    }

    println!(
        "{:<6} {:<12} {:<12} {:<14} TITLE",
        "ID", "CREATED", "DUE", "PROJECT"
    );
    println!("{}", "-".repeat(70));

    for row in rows {
        let created = row.created_at.format("%Y-%m-%d").to_string();
        let due = row
            .due_at
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        println!(
            "{:<6} {:<12} {:<12} {:<14} {}",
            row.id,
            created,
            due,
            row.project_label(),
            row.title
        );
    }

    println!();
    println!("Total tasks: {}", rows.len());
}

/// Asks a yes/no question on stdin; anything but y/yes declines
fn confirm(prompt: &str) -> Result<bool> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    let answer = answer.trim().to_lowercase();

    Ok(answer == "y" || answer == "yes")
}
