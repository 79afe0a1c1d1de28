//! CSV export
//!
//! One-way snapshot of the task list. The file is never read back.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::Task;

/// Column order of the export
pub const CSV_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "description",
    "category",
    "due_date",
    "priority",
    "status",
];

/// Quotes a field when it holds a separator, quote or line break
fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Formats one task as a CSV record (without line terminator)
pub fn record(task: &Task) -> String {
    let fields = [
        task.id.to_string(),
        task.title.clone(),
        task.description.clone(),
        task.category.clone(),
        task.due_date_string(),
        task.priority.label().to_string(),
        task.status.label().to_string(),
    ];
    fields
        .iter()
        .map(|f| escape(f))
        .collect::<Vec<_>>()
        .join(",")
}

/// Writes tasks as CSV to any writer
pub fn write_csv<W: Write>(mut writer: W, tasks: &[Task]) -> std::io::Result<()> {
    writeln!(writer, "{}", CSV_COLUMNS.join(","))?;
    for task in tasks {
        writeln!(writer, "{}", record(task))?;
    }
    writer.flush()
}

/// CSV export target
pub struct CsvExport {
    path: PathBuf,
}

impl CsvExport {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path of the export file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the snapshot, replacing any previous export
    pub fn write(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let file = File::create(&self.path)
            .with_context(|| format!("Failed to create CSV file: {}", self.path.display()))?;

        write_csv(BufWriter::new(file), tasks)
            .with_context(|| format!("Failed to write CSV file: {}", self.path.display()))
    }
}
