//! taskman - a local, single-user task tracker
//!
//! Tasks live in a JSON file and are managed one command per invocation:
//! add, edit, complete, delete, search and export to CSV. The domain layer
//! holds the in-memory store, ID allocation and search; storage and the
//! CLI sit on top of it.

pub mod domain;
pub mod storage;
pub mod cli;

pub use domain::{MatchMode, Priority, Query, Status, Task, TaskId, TaskInput, TaskStore};
