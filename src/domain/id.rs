//! Task identifiers and the allocator that issues them
//!
//! IDs are positive integers. The allocator only moves forward: deleted IDs
//! are never handed out again, and IDs restored from disk push the counter
//! past them so new tasks cannot collide after a reload.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum IdError {
    #[error("Invalid task ID: expected a positive integer, got '{0}'")]
    InvalidTaskId(String),

    #[error("No task IDs left after {0}")]
    Exhausted(u64),
}

/// Task ID, a positive integer unique within a store
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Creates a task ID, rejecting zero
    pub fn new(value: u64) -> Result<Self, IdError> {
        if value == 0 {
            return Err(IdError::InvalidTaskId(value.to_string()));
        }
        Ok(Self(value))
    }

    /// Returns the numeric value
    pub fn get(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TaskId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let value: u64 = s
            .parse()
            .map_err(|_| IdError::InvalidTaskId(s.to_string()))?;
        Self::new(value)
    }
}

/// Issues strictly increasing task IDs
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Creates an allocator that will issue `1` first
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an allocator seeded from the highest ID already in use
    pub fn seeded(max_seen: Option<TaskId>) -> Self {
        Self {
            last: max_seen.map(|id| id.get()).unwrap_or(0),
        }
    }

    /// Records an ID that exists elsewhere so it will never be issued
    pub fn observe(&mut self, id: TaskId) {
        self.last = self.last.max(id.get());
    }

    /// Returns the highest ID issued or observed so far
    pub fn last(&self) -> u64 {
        self.last
    }

    /// Issues the next ID
    ///
    /// Fails once the counter has reached `u64::MAX`; the counter is left as is.
    pub fn next(&mut self) -> Result<TaskId, IdError> {
        let next = self.last.checked_add(1).ok_or(IdError::Exhausted(self.last))?;
        self.last = next;
        Ok(TaskId(next))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_task_id() {
        let id: TaskId = "42".parse().unwrap();
        assert_eq!(id.get(), 42);
        assert_eq!(id.to_string(), "42");

        let id: TaskId = " 7 ".parse().unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn reject_invalid_task_ids() {
        assert!("0".parse::<TaskId>().is_err());
        assert!("-3".parse::<TaskId>().is_err());
        assert!("abc".parse::<TaskId>().is_err());
        assert!("".parse::<TaskId>().is_err());
        assert_eq!(
            "x".parse::<TaskId>(),
            Err(IdError::InvalidTaskId("x".to_string()))
        );
    }

    #[test]
    fn fresh_allocator_starts_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next().unwrap().get(), 1);
        assert_eq!(ids.next().unwrap().get(), 2);
        assert_eq!(ids.last(), 2);
    }

    #[test]
    fn seeded_allocator_continues_after_max() {
        let mut ids = IdAllocator::seeded(Some(TaskId::new(9).unwrap()));
        assert_eq!(ids.next().unwrap().get(), 10);

        let mut empty = IdAllocator::seeded(None);
        assert_eq!(empty.next().unwrap().get(), 1);
    }

    #[test]
    fn observe_never_moves_backwards() {
        let mut ids = IdAllocator::new();
        ids.observe(TaskId::new(5).unwrap());
        ids.observe(TaskId::new(3).unwrap());
        assert_eq!(ids.next().unwrap().get(), 6);
    }

    #[test]
    fn exhausted_allocator_fails_without_wrapping() {
        let mut ids = IdAllocator::new();
        ids.observe(TaskId::new(u64::MAX).unwrap());

        assert_eq!(ids.next(), Err(IdError::Exhausted(u64::MAX)));
        assert_eq!(ids.next(), Err(IdError::Exhausted(u64::MAX)));
        assert_eq!(ids.last(), u64::MAX);
    }

    #[test]
    fn serializes_as_plain_number() {
        let id = TaskId::new(3).unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "3");
        let back: TaskId = serde_json::from_str("3").unwrap();
        assert_eq!(back, id);
    }
}
