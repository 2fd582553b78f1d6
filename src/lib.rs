//! Chore - a personal task-tracking CLI
//!
//! Tasks live in a local SQLite database, optionally grouped into
//! projects and annotated with due dates given as absolute dates or
//! relative shorthands ("3 days", "week", "2 months").

pub mod cli;
pub mod domain;
pub mod storage;

pub use domain::{ProjectId, TaskFilter, TaskId, TaskPatch, TaskRow};
