//! JSON storage for tasks
//!
//! Tasks are stored as a single JSON array. Every save rewrites the whole
//! file through a temp file and a rename, so a crash mid-write leaves the
//! previous version in place.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::domain::{Task, TaskStore};

/// Store for task data in a JSON file
pub struct JsonStore {
    path: PathBuf,
}

impl JsonStore {
    /// Creates a store backed by the given file
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the path to the store file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads all tasks, ordered by ID
    ///
    /// A missing or blank file is an empty task list.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read task file: {}", self.path.display()))?;

        if content.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut tasks: Vec<Task> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse task file: {}", self.path.display()))?;

        tasks.sort_by_key(|t| t.id);
        Ok(tasks)
    }

    /// Loads the file into an in-memory store
    pub fn load(&self) -> Result<TaskStore> {
        let tasks = self.read_all()?;
        TaskStore::from_tasks(tasks)
            .with_context(|| format!("Invalid task file: {}", self.path.display()))
    }

    /// Writes all tasks to the file (full rewrite)
    pub fn write_all(&self, tasks: &[Task]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory: {}", parent.display())
                })?;
            }
        }

        let temp_path = self.path.with_extension("json.tmp");

        {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;

            let mut writer = BufWriter::new(&file);
            serde_json::to_writer_pretty(&mut writer, tasks).context("Failed to serialize tasks")?;
            writeln!(writer).context("Failed to write task file")?;
            writer.flush().context("Failed to flush task file")?;
        }

        fs::rename(&temp_path, &self.path).with_context(|| {
            format!(
                "Failed to rename {} to {}",
                temp_path.display(),
                self.path.display()
            )
        })?;

        Ok(())
    }

    /// Saves the contents of an in-memory store
    pub fn save(&self, store: &TaskStore) -> Result<()> {
        self.write_all(store.tasks())
    }
}
