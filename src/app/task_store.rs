use std::path::Path;

use tracing::{debug, info};

use crate::app::models::{NewTask, Task};
use crate::app::storage::Storage;
use crate::error::{Result, TodoError};

// Result of marking a task as done
#[derive(Debug, PartialEq)]
pub enum Completion<'a> {
    Completed(&'a Task),
    AlreadyCompleted(&'a Task),
}

/// All tasks of one user, kept in stored order. Every mutation writes the
/// whole collection back before it returns.
pub struct TaskStore {
    items: Vec<Task>,
    max_id: i64,
    storage: Storage,
}

impl TaskStore {
    // Open the task file at `path` and load everything in it
    pub fn open(path: &Path) -> Result<TaskStore> {
        let mut storage = Storage::open(path)?;
        let snapshot = storage.load()?;
        if storage.is_new() {
            // A fresh file starts out holding a complete, empty collection
            storage.save(&[], 0)?;
        }
        Ok(TaskStore {
            items: snapshot.tasks,
            max_id: snapshot.max_id,
            storage,
        })
    }

    pub fn path(&self) -> &Path {
        self.storage.path()
    }

    pub fn max_id(&self) -> i64 {
        self.max_id
    }

    // CREATE
    pub fn add(&mut self, draft: NewTask) -> Result<&Task> {
        draft.validate()?;

        let previous_max = self.max_id;
        self.max_id += 1;
        self.items.push(Task::new(self.max_id, draft));

        if let Err(err) = self.persist() {
            self.items.pop();
            self.max_id = previous_max;
            return Err(err);
        }

        let task = &self.items[self.items.len() - 1];
        info!(id = task.id, priority = task.priority, "created task");
        Ok(task)
    }

    // READ
    // Incomplete tasks, earliest due date first (undated last), then highest priority
    pub fn list(&self) -> Vec<&Task> {
        let mut incomplete: Vec<&Task> = self.items.iter().filter(|t| !t.is_complete()).collect();
        incomplete.sort_by(|a, b| {
            let due_order = match (a.due_date, b.due_date) {
                (Some(a_due), Some(b_due)) => a_due.cmp(&b_due),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            };
            due_order.then_with(|| b.priority.cmp(&a.priority))
        });
        incomplete
    }

    pub fn get(&self, task_id: i64) -> Result<&Task> {
        self.items
            .iter()
            .find(|task| task.id == task_id)
            .ok_or(TodoError::NotFound(task_id))
    }

    // Every task, complete or not, in stored order
    pub fn report(&self) -> &[Task] {
        &self.items
    }

    // Incomplete tasks whose name contains any of the terms, ignoring case
    pub fn query<S: AsRef<str>>(&self, terms: &[S]) -> Vec<&Task> {
        let terms: Vec<String> = terms.iter().map(|t| t.as_ref().to_lowercase()).collect();
        self.items
            .iter()
            .filter(|task| !task.is_complete())
            .filter(|task| {
                let name = task.name.to_lowercase();
                terms.iter().any(|term| name.contains(term.as_str()))
            })
            .collect()
    }

    // UPDATE
    pub fn done(&mut self, task_id: i64) -> Result<Completion<'_>> {
        let index = self.index_of(task_id)?;

        if !self.items[index].complete() {
            debug!(id = task_id, "task already completed");
            return Ok(Completion::AlreadyCompleted(&self.items[index]));
        }

        if let Err(err) = self.persist() {
            self.items[index].completed = None;
            return Err(err);
        }

        info!(id = task_id, "completed task");
        Ok(Completion::Completed(&self.items[index]))
    }

    // DELETE
    // Ids are not reused or renumbered afterwards
    pub fn delete(&mut self, task_id: i64) -> Result<Task> {
        let index = self.index_of(task_id)?;
        let removed = self.items.remove(index);

        if let Err(err) = self.persist() {
            self.items.insert(index, removed);
            return Err(err);
        }

        info!(id = task_id, "deleted task");
        Ok(removed)
    }

    fn index_of(&self, task_id: i64) -> Result<usize> {
        self.items
            .iter()
            .position(|task| task.id == task_id)
            .ok_or(TodoError::NotFound(task_id))
    }

    fn persist(&mut self) -> Result<()> {
        self.storage.save(&self.items, self.max_id)
    }
}
