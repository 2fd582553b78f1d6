//! Domain types: identifiers, task models, due-date resolution, filters

pub mod due;
pub mod filter;
pub mod id;
pub mod task;

pub use filter::{FilterError, TaskFilter};
pub use id::{ParseIdError, ProjectId, TaskId};
pub use task::{TaskPatch, TaskRow};
