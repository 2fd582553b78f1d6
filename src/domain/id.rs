//! Identifier newtypes for tasks and projects
//!
//! Both identifiers are positive integers assigned by the store
//! (SQLite rowids). They are stable for the lifetime of the row and
//! never reused.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error parsing an identifier from user input
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseIdError {
    #[error("'{0}' is not a valid id; expected a positive integer")]
    Invalid(String),
}

/// Unique identifier for a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Wraps a raw rowid from the store
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = ParseIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().parse::<i64>() {
            Ok(n) if n > 0 => Ok(Self(n)),
            _ => Err(ParseIdError::Invalid(s.to_string())),
        }
    }
}

/// Unique identifier for a project
///
/// `ProjectId::NONE` (0) is the "no project" sentinel used as the
/// column default; it never refers to a stored project row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(i64);

impl ProjectId {
    /// The "no project" sentinel
    pub const NONE: ProjectId = ProjectId(0);

    /// Wraps a raw rowid from the store
    pub fn new(raw: i64) -> Self {
        Self(raw)
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }

    /// Returns true if this is the "no project" sentinel
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
