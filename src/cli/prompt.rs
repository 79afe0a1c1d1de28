//! Interactive, line-by-line task entry
//!
//! Each field is asked for until the answer is valid. Typing `cancel` (or
//! closing the input) aborts the whole form.

use std::io::{self, BufRead, Write};

use crate::domain::{parse_due_date, ParseError, Priority, Status, Task, TaskInput};

/// Answer that aborts the current form
pub const CANCEL: &str = "cancel";

/// Reads answers from `input` and writes prompts to `output`
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints a line of guidance
    pub fn say(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.output, "{}", message)
    }

    /// Reads one answer; `None` means cancelled
    fn read_answer(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let answer = line.trim_end_matches(['\r', '\n']).to_string();
        if answer.trim() == CANCEL {
            return Ok(None);
        }
        Ok(Some(answer))
    }

    /// Asks for a value until `parse` accepts it
    ///
    /// With a `current` value, an empty answer keeps it.
    pub fn ask<T, F>(&mut self, label: &str, current: Option<&str>, parse: F) -> io::Result<Option<T>>
    where
        F: Fn(&str) -> Result<T, ParseError>,
    {
        loop {
            match current {
                Some(value) => write!(self.output, "{} [{}]: ", label, value)?,
                None => write!(self.output, "{}: ", label)?,
            }
            self.output.flush()?;

            let Some(answer) = self.read_answer()? else {
                return Ok(None);
            };

            let answer = match current {
                Some(value) if answer.trim().is_empty() => value.to_string(),
                _ => answer,
            };

            match parse(&answer) {
                Ok(value) => return Ok(Some(value)),
                Err(e) => writeln!(self.output, "Error: {}", e)?,
            }
        }
    }
}

fn text(field: &'static str) -> impl Fn(&str) -> Result<String, ParseError> {
    move |s| {
        let s = s.trim();
        if s.is_empty() {
            Err(ParseError::EmptyField(field))
        } else {
            Ok(s.to_string())
        }
    }
}

fn date(s: &str) -> Result<String, ParseError> {
    parse_due_date(s).map(|d| d.format("%Y-%m-%d").to_string())
}

fn priority_hint() -> String {
    Priority::ALL
        .iter()
        .map(|p| format!("{} - {}", p.code(), p.label()))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Collects the fields of a new task
pub fn new_task<R: BufRead, W: Write>(p: &mut Prompter<R, W>) -> io::Result<Option<TaskInput>> {
    p.say(&format!(
        "Adding a task. Enter each field or '{}' to abort.",
        CANCEL
    ))?;

    let Some(title) = p.ask("Title", None, text("title"))? else {
        return Ok(None);
    };
    let Some(description) = p.ask("Description", None, text("description"))? else {
        return Ok(None);
    };
    let Some(category) = p.ask("Category", None, text("category"))? else {
        return Ok(None);
    };
    let Some(due_date) = p.ask("Due date", None, date)? else {
        return Ok(None);
    };
    p.say(&format!("Priority: {}", priority_hint()))?;
    let Some(priority) = p.ask("Priority", None, |s| s.parse::<Priority>())? else {
        return Ok(None);
    };

    Ok(Some(TaskInput::new(title, description, category, due_date, priority)))
}

/// Collects replacement fields for an existing task
///
/// Pressing enter keeps the value shown in brackets.
pub fn edit_task<R: BufRead, W: Write>(
    p: &mut Prompter<R, W>,
    task: &Task,
) -> io::Result<Option<TaskInput>> {
    p.say(&format!(
        "Editing task {}. Press enter to keep a value or type '{}' to abort.",
        task.id, CANCEL
    ))?;

    let Some(title) = p.ask("Title", Some(&task.title), text("title"))? else {
        return Ok(None);
    };
    let Some(description) = p.ask("Description", Some(&task.description), text("description"))?
    else {
        return Ok(None);
    };
    let Some(category) = p.ask("Category", Some(&task.category), text("category"))? else {
        return Ok(None);
    };
    let due = task.due_date_string();
    let Some(due_date) = p.ask("Due date", Some(&due), date)? else {
        return Ok(None);
    };
    p.say(&format!("Priority: {}", priority_hint()))?;
    let Some(priority) = p.ask("Priority", Some(task.priority.label()), |s| s.parse::<Priority>())?
    else {
        return Ok(None);
    };
    p.say("Status: 0 - Incomplete, 1 - Completed")?;
    let Some(status) = p.ask("Status", Some(task.status.label()), |s| s.parse::<Status>())? else {
        return Ok(None);
    };

    Ok(Some(
        TaskInput::new(title, description, category, due_date, priority).with_status(status),
    ))
}
