//! Domain models for the task tracker
//!
//! Contains the core business logic without any I/O concerns.

mod id;
mod task;
mod store;
mod query;

pub use id::{IdError, TaskId};
pub use task::{parse_due_date, ParseError, Priority, Status, Task, TaskFields, TaskInput};
pub use store::{TaskError, TaskStore};
pub use query::{MatchMode, Query};
