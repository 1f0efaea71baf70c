//! Priority, tag and due-date filters.
//!
//! # Invariants
//! - Filters never reorder tasks.
//! - `due_before` is a strict bound: tasks due on the cutoff date are excluded,
//!   and tasks without a due date never match an active cutoff.

use crate::model::task::{Priority, Task};
use chrono::NaiveDate;

/// Optional criteria applied by [`filter_tasks`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub priority: Option<Priority>,
    /// Matched case-insensitively against each tag.
    pub tag: Option<String>,
    /// Exclusive cutoff date.
    pub due_before: Option<NaiveDate>,
}

impl TaskFilter {
    /// Returns whether no criterion is set.
    pub fn is_empty(&self) -> bool {
        self.priority.is_none() && self.tag.is_none() && self.due_before.is_none()
    }

    /// Returns whether `task` satisfies every active criterion.
    pub fn matches(&self, task: &Task) -> bool {
        matches_priority(task, self.priority)
            && matches_tag(task, self.tag.as_deref())
            && matches_due_before(task, self.due_before)
    }
}

pub fn filter_by_priority(tasks: Vec<Task>, priority: Option<Priority>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| matches_priority(task, priority))
        .collect()
}

/// Keeps tasks carrying `tag` (case-insensitive). An empty tag is ignored.
pub fn filter_by_tag(tasks: Vec<Task>, tag: Option<&str>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| matches_tag(task, tag))
        .collect()
}

/// Keeps tasks due strictly before `cutoff`.
pub fn filter_by_due_before(tasks: Vec<Task>, cutoff: Option<NaiveDate>) -> Vec<Task> {
    tasks
        .into_iter()
        .filter(|task| matches_due_before(task, cutoff))
        .collect()
}

/// Applies priority, then tag, then due-date filtering.
pub fn filter_tasks(tasks: Vec<Task>, filter: &TaskFilter) -> Vec<Task> {
    let filtered = filter_by_priority(tasks, filter.priority);
    let filtered = filter_by_tag(filtered, filter.tag.as_deref());
    filter_by_due_before(filtered, filter.due_before)
}

fn matches_priority(task: &Task, priority: Option<Priority>) -> bool {
    priority.map_or(true, |wanted| task.priority == wanted)
}

fn matches_tag(task: &Task, tag: Option<&str>) -> bool {
    match tag {
        Some(value) if !value.is_empty() => task.has_tag(value),
        _ => true,
    }
}

fn matches_due_before(task: &Task, cutoff: Option<NaiveDate>) -> bool {
    match cutoff {
        Some(cutoff) => task.due_date.is_some_and(|due| due.date() < cutoff),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::TaskFilter;
    use crate::model::task::{Priority, Task};

    #[test]
    fn empty_filter_matches_everything() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert!(filter.matches(&Task::new(1, "anything").unwrap()));
    }

    #[test]
    fn blank_tag_criterion_is_ignored() {
        let filter = TaskFilter {
            tag: Some(String::new()),
            ..TaskFilter::default()
        };
        assert!(filter.matches(&Task::new(1, "untagged").unwrap()));
    }

    #[test]
    fn matches_requires_every_criterion() {
        let mut task = Task::new(1, "ship").unwrap();
        task.priority = Priority::High;
        task.tags = vec!["Work".to_string()];

        let filter = TaskFilter {
            priority: Some(Priority::High),
            tag: Some("work".to_string()),
            due_before: None,
        };
        assert!(filter.matches(&task));

        task.priority = Priority::Low;
        assert!(!filter.matches(&task));
    }
}
