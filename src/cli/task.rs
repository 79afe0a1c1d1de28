//! Task commands
//!
//! Each command works on the in-memory [`TaskStore`] and returns a
//! [`Report`]: one human-readable line per outcome. Item-level failures
//! (unknown IDs, invalid input) become report lines; only I/O problems are
//! returned as errors.

use anyhow::Result;

use crate::domain::{Query, Status, Task, TaskId, TaskInput, TaskStore};
use crate::storage::CsvExport;

/// Outcome of a command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    lines: Vec<String>,
    changed: bool,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    /// A report with a single line and no changes
    pub fn message(line: impl Into<String>) -> Self {
        let mut report = Self::new();
        report.push(line);
        report
    }

    fn into_changed(mut self) -> Self {
        self.changed = true;
        self
    }

    fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    fn push_change(&mut self, line: impl Into<String>) {
        self.changed = true;
        self.push(line);
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Returns true if the store was modified and needs saving
    pub fn changed(&self) -> bool {
        self.changed
    }

    /// Returns all lines, each terminated by a newline
    pub fn text(&self) -> String {
        self.lines.iter().map(|l| format!("{}\n", l)).collect()
    }
}

/// Removes repeated IDs, keeping first occurrences
fn unique(ids: &[TaskId]) -> Vec<TaskId> {
    let mut seen = Vec::with_capacity(ids.len());
    for &id in ids {
        if !seen.contains(&id) {
            seen.push(id);
        }
    }
    seen
}

fn not_found(id: TaskId) -> String {
    format!("Task with ID {} not found.", id)
}

/// Adds a task
pub fn add(store: &mut TaskStore, input: &TaskInput) -> Report {
    match store.insert(input) {
        Ok(task) => Report::message(format!("Task \"{}\" added with ID {}.", task.title, task.id))
            .into_changed(),
        Err(e) => Report::message(format!("{}.", e)),
    }
}

/// Marks tasks as completed
pub fn complete(store: &mut TaskStore, ids: &[TaskId]) -> Report {
    let mut report = Report::new();
    for id in unique(ids) {
        match store.complete(id) {
            Ok(task) => report.push_change(format!(
                "Task \"{}\" marked as {}.",
                task.title,
                Status::Completed
            )),
            Err(_) => report.push(not_found(id)),
        }
    }
    report
}

/// Deletes tasks by ID
pub fn delete_ids(store: &mut TaskStore, ids: &[TaskId]) -> Report {
    let ids = unique(ids);
    let (found, missing) = store.find_all_by_ids(&ids);
    let titles: Vec<(TaskId, String)> = found.iter().map(|t| (t.id, t.title.clone())).collect();

    store.remove_where(|t| titles.iter().any(|(id, _)| *id == t.id));

    let mut report = Report::new();
    for id in ids {
        if missing.contains(&id) {
            report.push(not_found(id));
        } else if let Some((_, title)) = titles.iter().find(|(found, _)| *found == id) {
            report.push_change(format!("Task \"{}\" deleted (ID {}).", title, id));
        }
    }
    report
}

/// Deletes every task in the given categories (case-insensitive, exact)
pub fn delete_categories(store: &mut TaskStore, categories: &[String]) -> Report {
    let mut report = Report::new();
    for category in categories {
        let wanted = category.trim().to_lowercase();
        let removed = store.remove_where(|t| t.category.to_lowercase() == wanted);

        if removed.is_empty() {
            report.push(format!("No task with category \"{}\" found.", category));
        }
        for task in removed {
            report.push_change(format!(
                "Task \"{}\" deleted (category \"{}\").",
                task.title, task.category
            ));
        }
    }
    report
}

/// Replaces every field of a task
pub fn edit(store: &mut TaskStore, id: TaskId, input: &TaskInput) -> Report {
    match store.update(id, input) {
        Ok(task) => Report::message(format!("Task with ID {} updated.", task.id)).into_changed(),
        Err(e) => Report::message(format!("{}.", e)),
    }
}

/// Incomplete tasks in store order
pub fn current(store: &TaskStore) -> Vec<&Task> {
    store.query(&Query::all().status(Status::Incomplete))
}

/// Tasks matching the query
pub fn search<'a>(store: &'a TaskStore, query: &Query) -> Vec<&'a Task> {
    store.query(query)
}

/// Writes the CSV snapshot
pub fn export_csv(store: &TaskStore, export: &CsvExport) -> Result<Report> {
    export.write(store.tasks())?;
    Ok(Report::message(format!(
        "Exported {} task(s) to {}.",
        store.len(),
        export.path().display()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Priority;
    use tempfile::TempDir;

    fn id(n: u64) -> TaskId {
        TaskId::new(n).unwrap()
    }

    /// Store holding one training task with ID 1
    fn seeded() -> TaskStore {
        let mut store = TaskStore::new();
        store
            .insert(&TaskInput::new(
                "Learn FastAPI basics",
                "Go through the FastAPI docs and build a simple project",
                "Training",
                "2024-12-10",
                Priority::High,
            ))
            .unwrap();
        store
    }

    fn add_test_task(store: &mut TaskStore) -> Report {
        add(
            store,
            &TaskInput::new("Test add", "Testing task creation", "Test", "2024-12-10", Priority::Low),
        )
    }

    #[test]
    fn add_reports_new_id() {
        let mut store = seeded();
        let report = add_test_task(&mut store);

        assert_eq!(report.text(), "Task \"Test add\" added with ID 2.\n");
        assert!(report.changed());

        let task = store.find_by_id(id(2)).unwrap();
        assert_eq!(task.priority.label(), "Low");
        assert_eq!(task.status, Status::Incomplete);
    }

    #[test]
    fn add_with_bad_date_reports_invalid_input() {
        let mut store = seeded();
        let report = add(
            &mut store,
            &TaskInput::new("Test add", "Testing", "Test", "day", Priority::Low),
        );

        assert_eq!(report.text(), "Invalid input: unrecognised due date 'day'.\n");
        assert!(!report.changed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn complete_changes_only_target() {
        let mut store = seeded();
        add_test_task(&mut store);
        let first = store.find_by_id(id(1)).unwrap().clone();

        let report = complete(&mut store, &[id(2)]);

        assert_eq!(report.text(), "Task \"Test add\" marked as Completed.\n");
        assert_eq!(store.find_by_id(id(2)).unwrap().status, Status::Completed);
        assert_eq!(store.find_by_id(id(1)).unwrap(), &first);
    }

    #[test]
    fn complete_unknown_id() {
        let mut store = seeded();
        let report = complete(&mut store, &[id(10000)]);

        assert_eq!(report.text(), "Task with ID 10000 not found.\n");
        assert!(!report.changed());
    }

    #[test]
    fn complete_batch_continues_past_missing_ids() {
        let mut store = seeded();
        add_test_task(&mut store);
        let report = complete(&mut store, &[id(7), id(1), id(2), id(1)]);

        assert_eq!(
            report.lines(),
            &[
                "Task with ID 7 not found.".to_string(),
                "Task \"Learn FastAPI basics\" marked as Completed.".to_string(),
                "Task \"Test add\" marked as Completed.".to_string(),
            ]
        );
    }

    #[test]
    fn edit_replaces_fields() {
        let mut store = seeded();
        add_test_task(&mut store);
        let input = TaskInput::new(
            "Test edit",
            "Editing task \"Test add\"",
            "Test",
            "2024-12-12",
            Priority::Medium,
        )
        .with_status(Status::Completed);

        let report = edit(&mut store, id(2), &input);

        assert_eq!(report.text(), "Task with ID 2 updated.\n");
        let task = store.find_by_id(id(2)).unwrap();
        assert_eq!(task.title, "Test edit");
        assert_eq!(task.due_date_string(), "2024-12-12");
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn edit_unknown_id() {
        let mut store = seeded();
        let input = TaskInput::new("Test edit", "x", "Test", "2024-12-12", Priority::Medium);
        let report = edit(&mut store, id(10000), &input);

        assert_eq!(report.text(), "Task with ID 10000 not found.\n");
    }

    #[test]
    fn edit_with_bad_date_leaves_task_unchanged() {
        let mut store = seeded();
        let before = store.find_by_id(id(1)).unwrap().clone();
        let input = TaskInput::new("Test edit", "x", "Test", "day", Priority::Medium);

        let report = edit(&mut store, id(1), &input);

        assert!(report.text().starts_with("Invalid input:"));
        assert!(!report.changed());
        assert_eq!(store.find_by_id(id(1)).unwrap(), &before);
    }

    #[test]
    fn search_modes() {
        let mut store = seeded();
        add_test_task(&mut store);
        complete(&mut store, &[id(2)]);

        let by_text = search(&store, &Query::any().text("Test"));
        let by_category = search(&store, &Query::any().category("Test"));
        let by_status = search(&store, &Query::any().status(Status::Completed));
        let all = search(
            &store,
            &Query::all().text("Test").category("Test").status(Status::Completed),
        );

        for result in [by_text, by_category, by_status, all] {
            assert_eq!(result.len(), 1);
            assert_eq!(result[0].id, id(2));
        }

        let excluded = search(&store, &Query::all().category("Test").status(Status::Incomplete));
        assert!(excluded.is_empty());
        assert!(search(&store, &Query::any().text("\"-v-\"")).is_empty());
    }

    #[test]
    fn current_lists_incomplete_tasks() {
        let mut store = seeded();
        add_test_task(&mut store);
        complete(&mut store, &[id(2)]);

        let tasks = current(&store);
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].id, id(1));
    }

    #[test]
    fn delete_ids_reports_each_id() {
        let mut store = seeded();
        let report = delete_ids(&mut store, &[id(10000), id(1)]);

        assert_eq!(
            report.text(),
            "Task with ID 10000 not found.\nTask \"Learn FastAPI basics\" deleted (ID 1).\n"
        );
        assert!(report.changed());
        assert!(store.is_empty());
    }

    #[test]
    fn delete_several_ids_removes_the_right_tasks() {
        let mut store = seeded();
        for _ in 0..3 {
            add_test_task(&mut store);
        }
        delete_ids(&mut store, &[id(2), id(4)]);

        let remaining: Vec<u64> = store.iter().map(|t| t.id.get()).collect();
        assert_eq!(remaining, vec![1, 3]);
    }

    #[test]
    fn delete_categories_reports_each_category() {
        let mut store = seeded();
        add_test_task(&mut store);
        let report = delete_categories(&mut store, &[" -v- ".to_string(), "test".to_string()]);

        assert_eq!(
            report.text(),
            "No task with category \" -v- \" found.\nTask \"Test add\" deleted (category \"Test\").\n"
        );
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_category_is_exact_match() {
        let mut store = seeded();
        let report = delete_categories(&mut store, &["Train".to_string()]);

        assert!(!report.changed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn export_csv_writes_file() {
        let dir = TempDir::new().unwrap();
        let export = CsvExport::new(dir.path().join("tasks.csv"));
        let store = seeded();

        let report = export_csv(&store, &export).unwrap();

        assert!(report.text().starts_with("Exported 1 task(s) to "));
        assert!(!report.changed());
        assert!(export.path().exists());
    }
}
