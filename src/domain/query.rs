//! Task search
//!
//! A [`Query`] holds up to three optional criteria and a [`MatchMode`]
//! deciding how they combine. Criteria the caller did not supply are never
//! evaluated. A query with no criteria at all matches every task.

use super::task::{Status, Task};

/// How supplied criteria combine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MatchMode {
    /// At least one supplied criterion holds
    #[default]
    Any,
    /// Every supplied criterion holds
    All,
}

/// Filter over tasks
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    text: Option<String>,
    category: Option<String>,
    status: Option<Status>,
    mode: MatchMode,
}

/// Trims and lowercases the needle, treating blank strings as not supplied
fn needle(value: impl Into<String>) -> Option<String> {
    let value = value.into();
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_lowercase())
    }
}

impl Query {
    /// Creates an empty query in [`MatchMode::Any`]
    pub fn any() -> Self {
        Self::default()
    }

    /// Creates an empty query in [`MatchMode::All`]
    pub fn all() -> Self {
        Self {
            mode: MatchMode::All,
            ..Self::default()
        }
    }

    /// Sets the combination mode
    pub fn mode(mut self, mode: MatchMode) -> Self {
        self.mode = mode;
        self
    }

    /// Matches text in the title or description
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = needle(text);
        self
    }

    /// Matches a fragment of the category
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = needle(category);
        self
    }

    /// Matches the completion status exactly
    pub fn status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Returns true if no criteria were supplied
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.category.is_none() && self.status.is_none()
    }

    /// Evaluates each supplied criterion against the task
    fn checks(&self, task: &Task) -> Vec<bool> {
        let mut results = Vec::with_capacity(3);
        if let Some(text) = &self.text {
            results.push(task.mentions(text));
        }
        if let Some(category) = &self.category {
            results.push(task.category.to_lowercase().contains(category.as_str()));
        }
        if let Some(status) = self.status {
            results.push(task.status == status);
        }
        results
    }

    /// Returns true if the task satisfies the query
    pub fn matches(&self, task: &Task) -> bool {
        if self.is_empty() {
            return true;
        }
        let checks = self.checks(task);
        match self.mode {
            MatchMode::Any => checks.iter().any(|&ok| ok),
            MatchMode::All => checks.iter().all(|&ok| ok),
        }
    }

    /// Returns the matching tasks in input order
    pub fn filter<'a>(&self, tasks: impl IntoIterator<Item = &'a Task>) -> Vec<&'a Task> {
        tasks.into_iter().filter(|t| self.matches(t)).collect()
    }
}
