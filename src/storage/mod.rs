//! # Storage Layer
//!
//! Persistence for the task tracker.
//!
//! ## Storage Formats
//!
//! | Data | Format | Location |
//! |------|--------|----------|
//! | Tasks | JSON array | `tasks.json` (configurable) |
//! | Export | CSV with header row | `tasks.csv` (configurable) |
//! | Config | TOML | `~/.config/taskman/config.toml` |
//!
//! ## Write Safety
//!
//! - The task file is rewritten whole on every save (temp file + rename)
//! - There is no locking; the last writer wins
//!
//! ## Key Types
//!
//! - [`JsonStore`] - Load/save tasks as JSON
//! - [`CsvExport`] - One-way CSV snapshot
//! - [`Config`] - File locations and table settings

mod json;
mod csv;
mod config;

pub use json::JsonStore;
pub use csv::CsvExport;
pub use config::{Config, ConfigError, TableConfig};
