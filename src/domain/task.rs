//! Task domain model
//!
//! A task is a single unit of work with a due date, a priority and a
//! completion status. Raw user input goes through [`TaskInput::validate`]
//! before it can become part of a task, so the rest of the crate only ever
//! sees trimmed, non-empty text and typed enum values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use super::id::TaskId;

/// Rejected field input
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unrecognised due date '{0}'")]
    InvalidDate(String),

    #[error("invalid priority '{0}': expected 0, 1, 2 or Low, Medium, High")]
    InvalidPriority(String),

    #[error("invalid status '{0}': expected 0, 1 or Incomplete, Completed")]
    InvalidStatus(String),

    #[error("{0} must not be empty")]
    EmptyField(&'static str),
}

/// Priority of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Priority {
    #[default]
    Low,
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Returns the priority for a numeric code (0, 1 or 2)
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            0 => Ok(Priority::Low),
            1 => Ok(Priority::Medium),
            2 => Ok(Priority::High),
            other => Err(ParseError::InvalidPriority(other.to_string())),
        }
    }

    /// Returns the numeric code
    pub fn code(&self) -> u8 {
        match self {
            Priority::Low => 0,
            Priority::Medium => 1,
            Priority::High => 2,
        }
    }

    /// Returns the display label
    pub fn label(&self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
        }
    }

    /// Parses a display label, including labels written by older versions
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(label))
            .or(match label {
                "Низкий" => Some(Priority::Low),
                "Средний" => Some(Priority::Medium),
                "Высокий" => Some(Priority::High),
                _ => None,
            })
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    /// Accepts a code (`"2"`) or a label (`"High"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(code) = s.trim().parse::<i64>() {
            return Self::from_code(code);
        }
        Self::from_label(s).ok_or_else(|| ParseError::InvalidPriority(s.to_string()))
    }
}

impl Serialize for Priority {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct PriorityVisitor;

        impl<'de> Visitor<'de> for PriorityVisitor {
            type Value = Priority;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a priority code (0-2) or label")
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
                Priority::from_code(v).map_err(E::custom)
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                let code = i64::try_from(v).map_err(E::custom)?;
                Priority::from_code(code).map_err(E::custom)
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(PriorityVisitor)
    }
}

/// Completion status of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Incomplete,
    Completed,
}

impl Status {
    /// Returns the status for a numeric code (0 or 1)
    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            0 => Ok(Status::Incomplete),
            1 => Ok(Status::Completed),
            other => Err(ParseError::InvalidStatus(other.to_string())),
        }
    }

    pub fn from_bool(done: bool) -> Self {
        if done {
            Status::Completed
        } else {
            Status::Incomplete
        }
    }

    /// Returns true if this status represents completion
    pub fn is_complete(&self) -> bool {
        matches!(self, Status::Completed)
    }

    /// Returns the display label
    pub fn label(&self) -> &'static str {
        match self {
            Status::Incomplete => "Incomplete",
            Status::Completed => "Completed",
        }
    }

    /// Parses a display label, including labels written by older versions
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        [Status::Incomplete, Status::Completed]
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(label))
            .or(match label {
                "Не выполнена" => Some(Status::Incomplete),
                "Выполнена" => Some(Status::Completed),
                _ => None,
            })
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Status {
    type Err = ParseError;

    /// Accepts a code (`"1"`), a boolean (`"true"`) or a label (`"Completed"`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<i64>() {
            return Self::from_code(code);
        }
        if let Ok(done) = trimmed.parse::<bool>() {
            return Ok(Self::from_bool(done));
        }
        Self::from_label(trimmed).ok_or_else(|| ParseError::InvalidStatus(s.to_string()))
    }
}

impl Serialize for Status {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_bool(self.is_complete())
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::{Error, Visitor};

        struct StatusVisitor;

        impl<'de> Visitor<'de> for StatusVisitor {
            type Value = Status;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a boolean, a status code (0-1) or a status label")
            }

            fn visit_bool<E: Error>(self, v: bool) -> Result<Self::Value, E> {
                Ok(Status::from_bool(v))
            }

            fn visit_i64<E: Error>(self, v: i64) -> Result<Self::Value, E> {
                Status::from_code(v).map_err(E::custom)
            }

            fn visit_u64<E: Error>(self, v: u64) -> Result<Self::Value, E> {
                let code = i64::try_from(v).map_err(E::custom)?;
                Status::from_code(code).map_err(E::custom)
            }

            fn visit_str<E: Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(StatusVisitor)
    }
}

/// Date layouts tried in order after the ISO form
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y.%m.%d",
    "%d.%m.%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%B %d %Y",
    "%B %d, %Y",
    "%d %B %Y",
    "%d %B, %Y",
];

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Parses a due date from loosely formatted input
///
/// Accepts ISO dates, slash/dot separated dates, compact `YYYYMMDD`,
/// English month names and date-times (the time part is dropped).
pub fn parse_due_date(input: &str) -> Result<NaiveDate, ParseError> {
    let s = input.trim();
    let invalid = || ParseError::InvalidDate(input.to_string());

    if s.is_empty() {
        return Err(invalid());
    }

    // %Y is greedy, so the compact form is split by hand
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        let (year, rest) = s.split_at(4);
        let (month, day) = rest.split_at(2);
        return match (year.parse(), month.parse(), day.parse()) {
            (Ok(y), Ok(m), Ok(d)) => NaiveDate::from_ymd_opt(y, m, d).ok_or_else(invalid),
            _ => Err(invalid()),
        };
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Ok(date);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|dt| dt.date())
        .ok_or_else(invalid)
}

/// A task record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
}

impl Task {
    /// Creates a task from validated fields
    pub fn new(id: TaskId, fields: TaskFields) -> Self {
        Self {
            id,
            title: fields.title,
            description: fields.description,
            category: fields.category,
            due_date: fields.due_date,
            priority: fields.priority,
            status: fields.status,
        }
    }

    /// Replaces every editable field; the ID is kept
    pub fn apply(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
        self.category = fields.category;
        self.due_date = fields.due_date;
        self.priority = fields.priority;
        self.status = fields.status;
    }

    /// Marks the task as completed
    pub fn complete(&mut self) {
        self.status = Status::Completed;
    }

    /// Returns true if the text occurs in the title or description (case-insensitive)
    pub fn mentions(&self, text: &str) -> bool {
        let needle = text.to_lowercase();
        self.title.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Returns the due date as `YYYY-MM-DD`
    pub fn due_date_string(&self) -> String {
        self.due_date.format("%Y-%m-%d").to_string()
    }

    /// Trims the text fields, rejecting any that are blank
    pub fn normalize(&mut self) -> Result<(), ParseError> {
        self.title = required("title", &self.title)?;
        self.description = required("description", &self.description)?;
        self.category = required("category", &self.category)?;
        Ok(())
    }

    /// Returns the editable fields of this task
    pub fn fields(&self) -> TaskFields {
        TaskFields {
            title: self.title.clone(),
            description: self.description.clone(),
            category: self.category.clone(),
            due_date: self.due_date,
            priority: self.priority,
            status: self.status,
        }
    }
}

/// Validated task fields, ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: NaiveDate,
    pub priority: Priority,
    pub status: Status,
}

/// Raw task input as collected from arguments or prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub title: String,
    pub description: String,
    pub category: String,
    pub due_date: String,
    pub priority: Priority,
    pub status: Status,
}

impl TaskInput {
    /// Creates input for a new, incomplete task
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        due_date: impl Into<String>,
        priority: Priority,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            category: category.into(),
            due_date: due_date.into(),
            priority,
            status: Status::Incomplete,
        }
    }

    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Checks every field and normalises the due date
    pub fn validate(&self) -> Result<TaskFields, ParseError> {
        Ok(TaskFields {
            title: required("title", &self.title)?,
            description: required("description", &self.description)?,
            category: required("category", &self.category)?,
            due_date: parse_due_date(&self.due_date)?,
            priority: self.priority,
            status: self.status,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, ParseError> {
    let value = value.trim();
    if value.is_empty() {
        Err(ParseError::EmptyField(field))
    } else {
        Ok(value.to_string())
    }
}
