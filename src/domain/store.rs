//! In-memory task store
//!
//! Holds the ordered task list for one invocation together with the
//! [`IdAllocator`] that numbers new tasks. The store never touches the disk;
//! loading and saving live in [`crate::storage`].

use thiserror::Error;

use super::id::{IdAllocator, IdError, TaskId};
use super::query::Query;
use super::task::{ParseError, Task, TaskInput};

#[derive(Debug, Error, PartialEq)]
pub enum TaskError {
    #[error("Invalid input: {0}")]
    InvalidInput(#[from] ParseError),

    #[error("Task with ID {0} not found")]
    NotFound(TaskId),

    #[error("Duplicate task ID {0} in loaded data")]
    DuplicateId(TaskId),

    #[error("Task IDs must be positive")]
    ZeroId,

    #[error("{0}")]
    Id(#[from] IdError),
}

/// Ordered collection of tasks with unique IDs
#[derive(Debug, Clone, Default)]
pub struct TaskStore {
    tasks: Vec<Task>,
    ids: IdAllocator,
}

impl TaskStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from previously saved tasks
    ///
    /// Tasks are ordered by ID and the allocator is seeded with the highest
    /// ID found, so new tasks always get a fresh number. Text fields are
    /// trimmed; a blank title, description or category is rejected.
    pub fn from_tasks(mut tasks: Vec<Task>) -> Result<Self, TaskError> {
        tasks.sort_by_key(|t| t.id);

        let mut ids = IdAllocator::new();
        for pair in tasks.windows(2) {
            if pair[0].id == pair[1].id {
                return Err(TaskError::DuplicateId(pair[0].id));
            }
        }
        for task in &mut tasks {
            if task.id.get() == 0 {
                return Err(TaskError::ZeroId);
            }
            task.normalize()?;
            ids.observe(task.id);
        }

        Ok(Self { tasks, ids })
    }

    /// Returns all tasks in store order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Iterates over all tasks in store order
    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Returns the highest ID ever issued or loaded
    pub fn last_id(&self) -> u64 {
        self.ids.last()
    }

    /// Validates the input and appends it as a new task
    pub fn insert(&mut self, input: &TaskInput) -> Result<&Task, TaskError> {
        let fields = input.validate()?;
        let id = self.ids.next()?;
        self.tasks.push(Task::new(id, fields));
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Finds a task by ID
    pub fn find_by_id(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|t| t.id == id)
    }

    /// Resolves a batch of IDs, keeping input order
    ///
    /// Returns the tasks that exist and, separately, every ID that does not.
    /// An ID listed more than once is resolved only the first time.
    pub fn find_all_by_ids(&self, ids: &[TaskId]) -> (Vec<&Task>, Vec<TaskId>) {
        let mut found = Vec::new();
        let mut missing = Vec::new();
        let mut seen = Vec::with_capacity(ids.len());

        for &id in ids {
            if seen.contains(&id) {
                continue;
            }
            seen.push(id);
            match self.find_by_id(id) {
                Some(task) => found.push(task),
                None => missing.push(id),
            }
        }

        (found, missing)
    }

    /// Removes every task matching the predicate and returns them
    pub fn remove_where<F>(&mut self, mut predicate: F) -> Vec<Task>
    where
        F: FnMut(&Task) -> bool,
    {
        let (removed, kept): (Vec<Task>, Vec<Task>) = std::mem::take(&mut self.tasks)
            .into_iter()
            .partition(|t| predicate(t));
        self.tasks = kept;
        removed
    }

    /// Removes a single task by ID
    pub fn remove(&mut self, id: TaskId) -> Result<Task, TaskError> {
        let pos = self.position(id).ok_or(TaskError::NotFound(id))?;
        Ok(self.tasks.remove(pos))
    }

    /// Replaces the editable fields of a task
    ///
    /// The task is left untouched when the ID is unknown or the input is invalid.
    pub fn update(&mut self, id: TaskId, input: &TaskInput) -> Result<&Task, TaskError> {
        let pos = self.position(id).ok_or(TaskError::NotFound(id))?;
        let fields = input.validate()?;
        self.tasks[pos].apply(fields);
        Ok(&self.tasks[pos])
    }

    /// Marks a task as completed
    pub fn complete(&mut self, id: TaskId) -> Result<&Task, TaskError> {
        let pos = self.position(id).ok_or(TaskError::NotFound(id))?;
        self.tasks[pos].complete();
        Ok(&self.tasks[pos])
    }

    /// Runs a query over the store
    pub fn query(&self, query: &Query) -> Vec<&Task> {
        query.filter(&self.tasks)
    }

    /// Consumes the store, returning its tasks
    pub fn into_tasks(self) -> Vec<Task> {
        self.tasks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, Status};

    fn input(title: &str, category: &str) -> TaskInput {
        TaskInput::new(title, format!("{} description", title), category, "2024-12-10", Priority::Medium)
    }

    fn id(n: u64) -> TaskId {
        TaskId::new(n).unwrap()
    }

    fn store_with(titles: &[(&str, &str)]) -> TaskStore {
        let mut store = TaskStore::new();
        for (title, category) in titles {
            store.insert(&input(title, category)).unwrap();
        }
        store
    }

    #[test]
    fn insert_assigns_sequential_ids() {
        let store = store_with(&[("A", "x"), ("B", "y"), ("C", "z")]);
        let ids: Vec<u64> = store.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(store.iter().all(|t| t.status == Status::Incomplete));
    }

    #[test]
    fn insert_rejects_invalid_input_without_consuming_id() {
        let mut store = TaskStore::new();
        let bad = TaskInput::new("T", "D", "C", "day", Priority::Low);
        let err = store.insert(&bad).unwrap_err();
        assert!(matches!(err, TaskError::InvalidInput(ParseError::InvalidDate(_))));
        assert!(store.is_empty());

        let task = store.insert(&input("Ok", "c")).unwrap();
        assert_eq!(task.id.get(), 1);
    }

    #[test]
    fn deleted_ids_are_not_reused() {
        let mut store = store_with(&[("A", "x"), ("B", "y")]);
        store.remove(id(2)).unwrap();
        let task = store.insert(&input("C", "z")).unwrap();
        assert_eq!(task.id.get(), 3);
    }

    #[test]
    fn from_tasks_sorts_and_seeds_allocator() {
        let source = store_with(&[("A", "x"), ("B", "y"), ("C", "z")]);
        let mut tasks = source.into_tasks();
        tasks.reverse();
        tasks.remove(1); // drop id 2

        let mut store = TaskStore::from_tasks(tasks).unwrap();
        let ids: Vec<u64> = store.iter().map(|t| t.id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert_eq!(store.last_id(), 3);

        let task = store.insert(&input("D", "w")).unwrap();
        assert_eq!(task.id.get(), 4);
    }

    #[test]
    fn from_tasks_rejects_duplicates() {
        let source = store_with(&[("A", "x")]);
        let mut tasks = source.into_tasks();
        tasks.push(tasks[0].clone());

        let err = TaskStore::from_tasks(tasks).unwrap_err();
        assert_eq!(err, TaskError::DuplicateId(id(1)));
    }

    #[test]
    fn from_tasks_trims_text_and_rejects_blank_fields() {
        let mut tasks = store_with(&[("A", "x"), ("B", "y")]).into_tasks();
        tasks[0].category = " Work ".to_string();

        let store = TaskStore::from_tasks(tasks.clone()).unwrap();
        assert_eq!(store.find_by_id(id(1)).unwrap().category, "Work");

        tasks[1].description = "  ".to_string();
        let err = TaskStore::from_tasks(tasks).unwrap_err();
        assert_eq!(err, TaskError::InvalidInput(ParseError::EmptyField("description")));
    }

    #[test]
    fn insert_after_highest_possible_id_fails() {
        let mut tasks = store_with(&[("A", "x")]).into_tasks();
        tasks[0].id = id(u64::MAX);
        let mut store = TaskStore::from_tasks(tasks).unwrap();

        let err = store.insert(&input("B", "y")).unwrap_err();
        assert_eq!(err, TaskError::Id(IdError::Exhausted(u64::MAX)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn find_all_by_ids_reports_missing_in_order() {
        let store = store_with(&[("A", "x"), ("B", "y")]);
        let (found, missing) = store.find_all_by_ids(&[id(10000), id(2), id(7), id(1), id(2)]);

        let found: Vec<u64> = found.iter().map(|t| t.id.get()).collect();
        assert_eq!(found, vec![2, 1]);
        assert_eq!(missing, vec![id(10000), id(7)]);
    }

    #[test]
    fn remove_where_keeps_order_of_remaining() {
        let mut store = store_with(&[("A", "Work"), ("B", "home"), ("C", "work"), ("D", "x")]);
        let removed = store.remove_where(|t| t.category.eq_ignore_ascii_case("work"));

        assert_eq!(removed.len(), 2);
        let titles: Vec<&str> = store.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "D"]);
    }

    #[test]
    fn update_replaces_fields() {
        let mut store = store_with(&[("A", "x")]);
        let edit = TaskInput::new("Edited", "New desc", "Test", "2024-12-12", Priority::Medium)
            .with_status(Status::Completed);

        let task = store.update(id(1), &edit).unwrap();
        assert_eq!(task.title, "Edited");
        assert_eq!(task.category, "Test");
        assert_eq!(task.due_date_string(), "2024-12-12");
        assert_eq!(task.status, Status::Completed);
    }

    #[test]
    fn update_with_bad_date_leaves_task_unchanged() {
        let mut store = store_with(&[("A", "x")]);
        let before = store.find_by_id(id(1)).unwrap().clone();

        let edit = TaskInput::new("Edited", "New", "Test", "day", Priority::High);
        let err = store.update(id(1), &edit).unwrap_err();

        assert!(matches!(err, TaskError::InvalidInput(_)));
        assert_eq!(store.find_by_id(id(1)).unwrap(), &before);
    }

    #[test]
    fn update_unknown_id_is_not_found() {
        let mut store = store_with(&[("A", "x")]);
        let edit = input("B", "y");
        assert_eq!(store.update(id(10000), &edit).unwrap_err(), TaskError::NotFound(id(10000)));
    }

    #[test]
    fn complete_changes_only_status() {
        let mut store = store_with(&[("A", "Training"), ("B", "Test")]);
        let first_before = store.find_by_id(id(1)).unwrap().clone();
        let mut second_expected = store.find_by_id(id(2)).unwrap().clone();
        second_expected.status = Status::Completed;

        store.complete(id(2)).unwrap();

        assert_eq!(store.find_by_id(id(1)).unwrap(), &first_before);
        assert_eq!(store.find_by_id(id(2)).unwrap(), &second_expected);
        assert_eq!(store.complete(id(9)).unwrap_err(), TaskError::NotFound(id(9)));
    }
}
