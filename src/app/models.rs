use chrono::{DateTime, NaiveDate, Utc};
use derivative::Derivative;

use crate::error::{Result, TodoError};

pub const DEFAULT_PRIORITY: i32 = 1;
pub const MAX_PRIORITY: i32 = 3;

/// One to-do item. `id` and `created` never change after construction,
/// `completed` is stamped at most once.
#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: i64,
    pub name: String,
    pub priority: i32,
    pub created: DateTime<Utc>,
    pub due_date: Option<NaiveDate>,
    pub completed: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: i64, draft: NewTask) -> Task {
        Task {
            id,
            name: draft.name,
            priority: draft.priority,
            created: Utc::now(),
            due_date: draft.due_date,
            completed: None,
        }
    }

    // Stamp the completion time. Returns false if the task was already done,
    // in which case the original timestamp is kept.
    pub fn complete(&mut self) -> bool {
        if self.completed.is_some() {
            return false;
        }
        // Clock skew must not put completion before creation
        self.completed = Some(Utc::now().max(self.created));
        true
    }

    pub fn is_complete(&self) -> bool {
        self.completed.is_some()
    }

    // Whole days elapsed since creation
    pub fn age_days(&self, now: DateTime<Utc>) -> i64 {
        (now - self.created).num_days().max(0)
    }

    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_complete() && self.due_date.is_some_and(|due| due < today)
    }
}

// Content of a task that is about to be created
#[derive(Derivative, Clone)]
#[derivative(Default, Debug)]
pub struct NewTask {
    pub name: String,
    #[derivative(Default(value = "DEFAULT_PRIORITY"))]
    pub priority: i32,
    pub due_date: Option<NaiveDate>,
}

impl NewTask {
    pub fn named(name: impl Into<String>) -> NewTask {
        NewTask {
            name: name.into(),
            ..NewTask::default()
        }
    }

    pub fn with_priority(mut self, priority: i32) -> NewTask {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> NewTask {
        self.due_date = Some(due_date);
        self
    }

    // Checked before any state is touched
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(TodoError::invalid("task name cannot be empty"));
        }
        if !(DEFAULT_PRIORITY..=MAX_PRIORITY).contains(&self.priority) {
            return Err(TodoError::invalid(format!(
                "priority must be between {} and {}, got {}",
                DEFAULT_PRIORITY, MAX_PRIORITY, self.priority
            )));
        }
        Ok(())
    }
}
