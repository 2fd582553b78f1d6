//! Project name directory
//!
//! Maps project names to stable ids, creating a project the first time
//! an unseen name is referenced. Lookup is a case-insensitive prefix
//! match, so "wor" finds a project named "work". When the pattern
//! matches more than one project the lookup reports [`ProjectMatch::Ambiguous`]
//! and callers leave the task without a project rather than guessing.
//!
//! LIKE metacharacters in the user's input are escaped before binding,
//! so a name like "50%" can never widen the match.

use rusqlite::Connection;

use super::{StoreError, StoreResult};
use crate::domain::ProjectId;

/// Outcome of a project name lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProjectMatch {
    /// Exactly one existing project matched
    Existing(ProjectId),
    /// No project matched; one was created with the given name
    Created(ProjectId),
    /// More than one project matched; no project is applied
    Ambiguous,
}

impl ProjectMatch {
    /// The id to store on the task: the matched or created project,
    /// or the "no project" sentinel when the lookup was ambiguous.
    pub fn applied(&self) -> ProjectId {
        match self {
            ProjectMatch::Existing(id) | ProjectMatch::Created(id) => *id,
            ProjectMatch::Ambiguous => ProjectId::NONE,
        }
    }
}

/// Name-to-id directory over the projects table
pub struct ProjectDirectory<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> ProjectDirectory<'conn> {
    pub fn new(conn: &'conn mut Connection) -> Self {
        Self { conn }
    }

    /// Resolves a project name to its id, creating the project on
    /// first reference.
    ///
    /// Lookup and insert happen in one transaction; a failed insert
    /// rolls back and leaves no partial state.
    pub fn resolve_or_create(&mut self, name: &str) -> StoreResult<ProjectMatch> {
        let pattern = prefix_pattern(name);
        let tx = self.conn.transaction()?;

        let ids: Vec<i64> = {
            let mut stmt =
                tx.prepare("SELECT id FROM projects WHERE name LIKE ?1 ESCAPE '\\' ORDER BY id")?;
            let rows = stmt.query_map([pattern.as_str()], |row| row.get(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };

        let matched = match ids.as_slice() {
            [id] => ProjectMatch::Existing(ProjectId::new(*id)),
            [] => {
                tx.execute("INSERT INTO projects (name) VALUES (?1)", [name])?;
                ProjectMatch::Created(ProjectId::new(tx.last_insert_rowid()))
            }
            _ => ProjectMatch::Ambiguous,
        };

        tx.commit()?;
        Ok(matched)
    }

    /// Lists all known projects in creation order
    pub fn list(&self) -> StoreResult<Vec<(ProjectId, String)>> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM projects ORDER BY id")?;
        let rows = stmt.query_map([], |row| {
            Ok((ProjectId::new(row.get(0)?), row.get::<_, String>(1)?))
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(StoreError::from)
    }
}

/// Escapes LIKE metacharacters in the user value and appends the
/// prefix wildcard.
fn prefix_pattern(name: &str) -> String {
    let mut pattern = String::with_capacity(name.len() + 1);
    for c in name.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}
