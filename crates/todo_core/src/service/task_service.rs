//! Task use-case service.
//!
//! # Responsibility
//! - Provide add/list/update/complete/delete/search entry points.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Each call performs one load, an in-memory change and at most one save.
//! - A missing id is reported as `Ok(None)` and never triggers a write.
//! - `created_at` is never modified after creation.

use crate::filter::criteria::{filter_tasks, TaskFilter};
use crate::model::task::{validate_title, Priority, Task, TaskId};
use crate::repo::task_repo::{next_id_for, RepoResult, TaskRepository};
use chrono::NaiveDateTime;
use log::info;

/// Request model for creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }
}

/// Partial update; `None` keeps the stored value.
///
/// An empty `tags` list is treated as "keep", matching repeatable CLI flags
/// where no occurrence means no change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskUpdate {
    pub title: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDateTime>,
    pub tags: Option<Vec<String>>,
}

impl TaskUpdate {
    fn apply(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = self.tags.filter(|tags| !tags.is_empty()) {
            task.tags = tags;
        }
    }
}

/// Use-case service wrapper over a task repository.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Appends a new task with the next free id.
    ///
    /// Fails with `IdsExhausted` without writing when no id is left.
    pub fn add_task(&self, request: NewTask) -> RepoResult<Task> {
        let mut tasks = self.repo.load_all()?;

        let mut task = Task::new(next_id_for(&tasks)?, request.title)?;
        task.priority = request.priority;
        task.due_date = request.due_date;
        task.tags = request.tags;

        tasks.push(task.clone());
        self.repo.save_all(&tasks)?;
        info!("event=task_add module=service status=ok id={}", task.id);
        Ok(task)
    }

    /// Lists tasks in stored order.
    pub fn list_tasks(&self, show_completed: bool) -> RepoResult<Vec<Task>> {
        let tasks = self.repo.load_all()?;
        Ok(tasks
            .into_iter()
            .filter(|task| show_completed || !task.completed)
            .collect())
    }

    pub fn get_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_by_id(id)
    }

    /// Applies `update` to the task with `id`.
    ///
    /// Validation runs before anything is written.
    pub fn update_task(&self, id: TaskId, update: TaskUpdate) -> RepoResult<Option<Task>> {
        if let Some(title) = update.title.as_deref() {
            validate_title(title)?;
        }
        self.modify(id, "task_update", |task| update.apply(task))
    }

    /// Marks the task with `id` as completed.
    pub fn complete_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        self.modify(id, "task_complete", |task| task.completed = true)
    }

    /// Removes the task with `id` and returns it.
    pub fn delete_task(&self, id: TaskId) -> RepoResult<Option<Task>> {
        let mut tasks = self.repo.load_all()?;
        let Some(position) = tasks.iter().position(|task| task.id == id) else {
            info!("event=task_delete module=service status=not_found id={id}");
            return Ok(None);
        };

        let removed = tasks.remove(position);
        self.repo.save_all(&tasks)?;
        info!("event=task_delete module=service status=ok id={id}");
        Ok(Some(removed))
    }

    /// Loads the collection and keeps tasks matching every criterion.
    pub fn search(&self, filter: &TaskFilter) -> RepoResult<Vec<Task>> {
        Ok(filter_tasks(self.repo.load_all()?, filter))
    }

    fn modify(
        &self,
        id: TaskId,
        event: &str,
        change: impl FnOnce(&mut Task),
    ) -> RepoResult<Option<Task>> {
        let mut tasks = self.repo.load_all()?;
        let Some(task) = tasks.iter_mut().find(|task| task.id == id) else {
            info!("event={event} module=service status=not_found id={id}");
            return Ok(None);
        };

        change(task);
        task.validate()?;
        let updated = task.clone();

        self.repo.save_all(&tasks)?;
        info!("event={event} module=service status=ok id={id}");
        Ok(Some(updated))
    }
}
