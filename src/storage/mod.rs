//! # Storage Layer
//!
//! SQLite-backed persistence for tasks and projects.
//!
//! The connection is opened once by the process ([`db::open`]) and
//! passed explicitly into [`TaskStore`] and [`ProjectDirectory`];
//! tests use [`db::open_in_memory`] for an isolated store per test.
//! Every mutating operation runs in a single transaction: it commits
//! whole or rolls back with no partial state visible.

pub mod config;
pub mod db;
mod projects;
mod tasks;

use thiserror::Error;

pub use config::Config;
pub use projects::{ProjectDirectory, ProjectMatch};
pub use tasks::TaskStore;

/// Errors from the persistence layer
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("invalid data in store: {0}")]
    InvalidData(String),

    #[error("store failure: {0}")]
    Persistence(#[from] rusqlite::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;
