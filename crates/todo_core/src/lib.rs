//! Core domain logic for the to-do task manager.
//! This crate is the single source of truth for task invariants.

pub mod config;
pub mod export;
pub mod filter;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::StoreConfig;
pub use export::{export, ExportError, ExportFormat, ExportResult};
pub use filter::criteria::{
    filter_by_due_before, filter_by_priority, filter_by_tag, filter_tasks, TaskFilter,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::task::{
    parse_datetime, Priority, Task, TaskId, TaskRecord, TaskValidationError, MAX_TASK_ID,
};
pub use repo::task_repo::{JsonTaskRepository, RecordError, RepoError, RepoResult, TaskRepository};
pub use service::task_service::{NewTask, TaskService, TaskUpdate};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
