//! # Command-Line Interface
//!
//! User-facing commands, prompts and output formatting.
//!
//! ## Commands
//!
//! | Command | Purpose |
//! |---------|---------|
//! | `add`, `add_inter` | Create a task from arguments or prompts |
//! | `edit`, `edit_inter` | Replace the fields of a task |
//! | `completed` | Mark tasks as completed |
//! | `del` | Delete tasks by ID (`-i`) or category (`-c`) |
//! | `current` | Table of incomplete tasks |
//! | `search` | Filter by text, category and status |
//! | `csv` | Export a CSV snapshot |
//!
//! ## Output Formats
//!
//! All commands support the `--format` flag:
//! - `text` (default) - Human-readable output
//! - `json` - Machine-parseable JSON
//!
//! ## Verbose Mode
//!
//! Use `--verbose` (or `-v`) for debug output on stderr:
//! ```bash
//! tm --verbose current
//! ```
//!
//! ## Entry Point
//!
//! Call [`run()`] to parse arguments and execute the appropriate command.

mod app;
mod output;
mod prompt;
mod table;
mod task;

pub use app::{Cli, Commands, run};
pub use output::{Output, OutputFormat};
pub use task::Report;
