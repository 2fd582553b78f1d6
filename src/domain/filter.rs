//! Read-side narrowing of task listings
//!
//! Both filters are conjunctive: a title pattern anchored at the start
//! of the title (open at the end) and an exact match on the resolved
//! project display name. Filtering never touches the store.

use regex::Regex;
use thiserror::Error;

use super::task::TaskRow;

#[derive(Debug, Error)]
pub enum FilterError {
    #[error("invalid search pattern '{pattern}': {source}")]
    BadPattern {
        pattern: String,
        source: regex::Error,
    },
}

/// Conjunctive title-pattern and project filter
#[derive(Debug, Default)]
pub struct TaskFilter {
    pattern: Option<Regex>,
    project: Option<String>,
}

impl TaskFilter {
    /// Builds a filter from optional user inputs.
    ///
    /// The pattern is compiled anchored at the start of the title, so
    /// "Buy" matches "Buy milk" but not "Don't buy milk".
    pub fn new(pattern: Option<&str>, project: Option<&str>) -> Result<Self, FilterError> {
        let pattern = match pattern {
            Some(p) => Some(Regex::new(&format!("^(?:{p})")).map_err(|source| {
                FilterError::BadPattern {
                    pattern: p.to_string(),
                    source,
                }
            })?),
            None => None,
        };

        Ok(Self {
            pattern,
            project: project.map(str::to_string),
        })
    }

    /// Returns true if the row passes both filters
    pub fn matches(&self, row: &TaskRow) -> bool {
        if let Some(re) = &self.pattern {
            if !re.is_match(&row.title) {
                return false;
            }
        }

        if let Some(project) = &self.project {
            if row.project.as_deref() != Some(project.as_str()) {
                return false;
            }
        }

        true
    }

    /// Narrows a listing to the rows that pass both filters
    pub fn apply(&self, rows: Vec<TaskRow>) -> Vec<TaskRow> {
        rows.into_iter().filter(|row| self.matches(row)).collect()
    }
}
