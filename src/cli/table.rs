//! Fixed-width task tables for the terminal
//!
//! Rendering is a pure function of the task list: column widths grow to fit
//! the header and the widest cell, bounded by [`TableConfig`].

use crate::domain::Task;
use crate::storage::TableConfig;

/// A table column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Id,
    Title,
    Description,
    Category,
    DueDate,
    Priority,
    Status,
}

#[derive(Clone, Copy)]
enum Align {
    Left,
    Center,
    Right,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Id,
        Column::Title,
        Column::Description,
        Column::Category,
        Column::DueDate,
        Column::Priority,
        Column::Status,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            Column::Id => "ID",
            Column::Title => "Title",
            Column::Description => "Description",
            Column::Category => "Category",
            Column::DueDate => "Due date",
            Column::Priority => "Priority",
            Column::Status => "Status",
        }
    }

    fn align(&self) -> Align {
        match self {
            Column::Id => Align::Right,
            Column::Title | Column::Description => Align::Left,
            _ => Align::Center,
        }
    }

    /// Free-text columns are subject to the width limits
    fn is_text(&self) -> bool {
        matches!(self, Column::Title | Column::Description | Column::Category)
    }

    fn raw_cell(&self, task: &Task) -> String {
        match self {
            Column::Id => task.id.to_string(),
            Column::Title => task.title.clone(),
            Column::Description => task.description.clone(),
            Column::Category => task.category.clone(),
            Column::DueDate => task.due_date_string(),
            Column::Priority => task.priority.label().to_string(),
            Column::Status => task.status.label().to_string(),
        }
    }
}

fn truncate(text: String, max: Option<usize>) -> String {
    match max {
        Some(max) if text.chars().count() > max => {
            let cut: String = text.chars().take(max.saturating_sub(3)).collect();
            format!("{}...", cut)
        }
        _ => text,
    }
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{:<width$}", text, width = width),
        Align::Center => format!("{:^width$}", text, width = width),
        Align::Right => format!("{:>width$}", text, width = width),
    }
}

/// Renders tasks as a captioned table
///
/// Columns listed in `hidden` are left out. The ID column is always shown.
pub fn render(tasks: &[&Task], caption: &str, hidden: &[Column], config: &TableConfig) -> String {
    let columns: Vec<Column> = Column::ALL
        .into_iter()
        .filter(|c| *c == Column::Id || !hidden.contains(c))
        .collect();

    let rows: Vec<Vec<String>> = tasks
        .iter()
        .map(|task| {
            columns
                .iter()
                .map(|c| {
                    let cell = c.raw_cell(task);
                    if c.is_text() {
                        truncate(cell, config.max_width)
                    } else {
                        cell
                    }
                })
                .collect()
        })
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let floor = if c.is_text() { config.min_width } else { 0 };
            rows.iter()
                .map(|row| row[i].chars().count())
                .chain([c.header().chars().count(), floor])
                .max()
                .unwrap_or(0)
        })
        .collect();

    let total = widths.iter().sum::<usize>() + 3 * columns.len().saturating_sub(1);

    let header = columns
        .iter()
        .zip(&widths)
        .map(|(c, &w)| pad(c.header(), w, Align::Center))
        .collect::<Vec<_>>()
        .join(" | ");

    let mut lines = vec![
        "-".repeat(total),
        pad(caption, total, Align::Center),
        "=".repeat(total),
        header,
        "=".repeat(total),
    ];

    for row in &rows {
        let line = columns
            .iter()
            .zip(&widths)
            .zip(row)
            .map(|((c, &w), cell)| pad(cell, w, c.align()))
            .collect::<Vec<_>>()
            .join(" | ");
        lines.push(line);
    }

    lines.push("=".repeat(total));
    lines.join("\n")
}
