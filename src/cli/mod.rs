//! # Command-Line Interface
//!
//! User-facing commands and output formatting.
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `list` / `find` | Show unresolved tasks, optionally filtered |
//! | `add` | Create a task with optional due date and project |
//! | `change` | Partial update of title, due date, project, state |
//! | `resolve` | Mark a task resolved |
//! | `delete` | Remove a task after confirmation |
//! | `projects` | Show known projects |
//!
//! All commands support `--format text|json` and `--verbose`. The
//! store location comes from `--db` / `CHORE_DB`, the config file, or
//! the platform data directory. Call [`run()`] to parse arguments and
//! execute the appropriate command.

mod app;
mod output;
mod task;

pub use app::{run, Cli, Commands};
pub use output::{Output, OutputFormat};
