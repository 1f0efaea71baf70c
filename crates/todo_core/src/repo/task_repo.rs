//! Task repository contract and JSON file implementation.
//!
//! # Responsibility
//! - Load and store the whole task collection as one JSON array.
//! - Own the id assignment policy (`max + 1`).
//!
//! # Invariants
//! - Writes validate every task before touching the file.
//! - Writes replace the full collection; there is no partial update.
//! - A file that is missing or not a JSON array loads as an empty collection.
//! - Read paths reject invalid records instead of masking them.

use crate::config::StoreConfig;
use crate::model::task::{
    to_pretty_json, Task, TaskId, TaskRecord, TaskValidationError, MAX_TASK_ID,
};
use log::{error, info, warn};
use serde_json::Value;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for task persistence.
#[derive(Debug)]
pub enum RepoError {
    Io {
        path: PathBuf,
        source: io::Error,
    },
    Serialize(serde_json::Error),
    Validation(TaskValidationError),
    /// Element `index` of the stored array is not a valid task.
    InvalidRecord {
        index: usize,
        source: RecordError,
    },
    /// The largest stored id leaves no room for another task.
    IdsExhausted {
        max: TaskId,
    },
}

/// Why one stored element could not become a `Task`.
#[derive(Debug)]
pub enum RecordError {
    /// Wrong JSON shape, e.g. a string where a number belongs.
    Decode(serde_json::Error),
    Validation(TaskValidationError),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "i/o error on `{}`: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to serialize tasks: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::InvalidRecord { index, source } => {
                write!(f, "invalid stored task record #{index}: {source}")
            }
            Self::IdsExhausted { max } => {
                write!(f, "no task id left after {max}; maximum is {MAX_TASK_ID}")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::IdsExhausted { .. } => None,
        }
    }
}

impl Display for RecordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Decode(err) => write!(f, "{err}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Decode(err) => Some(err),
            Self::Validation(err) => Some(err),
        }
    }
}

impl From<TaskValidationError> for RepoError {
    fn from(value: TaskValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<serde_json::Error> for RepoError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Repository interface over one task collection.
pub trait TaskRepository {
    /// Loads every task in file order.
    fn load_all(&self) -> RepoResult<Vec<Task>>;

    /// Replaces the stored collection with `tasks`.
    fn save_all(&self, tasks: &[Task]) -> RepoResult<()>;

    /// Returns the first task with `id`, reloading the collection.
    fn get_by_id(&self, id: TaskId) -> RepoResult<Option<Task>> {
        Ok(self.load_all()?.into_iter().find(|task| task.id == id))
    }

    /// Returns `1` for an empty collection, otherwise `max(id) + 1`.
    ///
    /// Not coordinated across processes.
    fn next_id(&self) -> RepoResult<TaskId> {
        next_id_for(&self.load_all()?)
    }
}

/// Id policy shared by repository and service paths.
///
/// # Errors
/// - `IdsExhausted` when `max(id)` is already `MAX_TASK_ID`.
pub fn next_id_for(tasks: &[Task]) -> RepoResult<TaskId> {
    let Some(max) = tasks.iter().map(|task| task.id).max() else {
        return Ok(1);
    };
    max.checked_add(1)
        .filter(|id| *id <= MAX_TASK_ID)
        .ok_or(RepoError::IdsExhausted { max })
}

/// Task repository backed by a single pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonTaskRepository {
    path: PathBuf,
}

impl JsonTaskRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.data_file.clone())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: io::Error) -> RepoError {
        RepoError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl TaskRepository for JsonTaskRepository {
    fn load_all(&self) -> RepoResult<Vec<Task>> {
        let started_at = Instant::now();

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!("event=tasks_load module=repo status=ok source=missing count=0");
                return Ok(Vec::new());
            }
            Err(err) => {
                error!(
                    "event=tasks_load module=repo status=error error_code=read_failed error={}",
                    err
                );
                return Err(self.io_error(err));
            }
        };

        let items = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(items)) => items,
            Ok(_) => {
                warn!(
                    "event=tasks_load module=repo status=fallback reason=malformed_storage detail=not_an_array"
                );
                return Ok(Vec::new());
            }
            Err(err) => {
                warn!(
                    "event=tasks_load module=repo status=fallback reason=malformed_storage line={} column={}",
                    err.line(),
                    err.column()
                );
                return Ok(Vec::new());
            }
        };

        let tasks = items
            .into_iter()
            .enumerate()
            .map(|(index, item)| decode_task(index, item))
            .collect::<RepoResult<Vec<_>>>()
            .inspect_err(|err| {
                error!(
                    "event=tasks_load module=repo status=error error_code=invalid_record error={}",
                    err
                );
            })?;

        info!(
            "event=tasks_load module=repo status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(tasks)
    }

    fn save_all(&self, tasks: &[Task]) -> RepoResult<()> {
        let started_at = Instant::now();

        for task in tasks {
            task.validate()?;
        }

        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| RepoError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let records = tasks.iter().map(Task::to_record).collect::<Vec<_>>();
        let body = to_pretty_json(&records)?;

        // Write next to the target and rename over it, so a crash mid-write
        // leaves the previous collection intact.
        let staging = staging_path(&self.path);
        let written = fs::write(&staging, body).and_then(|()| fs::rename(&staging, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&staging);
            error!(
                "event=tasks_save module=repo status=error error_code=write_failed error={}",
                err
            );
            return Err(self.io_error(err));
        }

        info!(
            "event=tasks_save module=repo status=ok count={} duration_ms={}",
            tasks.len(),
            started_at.elapsed().as_millis()
        );
        Ok(())
    }
}

fn decode_task(index: usize, item: Value) -> RepoResult<Task> {
    serde_json::from_value::<TaskRecord>(item)
        .map_err(RecordError::Decode)
        .and_then(|record| Task::try_from(record).map_err(RecordError::Validation))
        .map_err(|source| RepoError::InvalidRecord { index, source })
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|value| value.to_os_string())
        .unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::{next_id_for, staging_path, RepoError};
    use crate::model::task::{Task, MAX_TASK_ID};
    use std::path::PathBuf;

    #[test]
    fn next_id_starts_at_one_and_follows_max() {
        assert_eq!(next_id_for(&[]).unwrap(), 1);

        let tasks = vec![
            Task::new(3, "c").unwrap(),
            Task::new(10, "j").unwrap(),
            Task::new(4, "d").unwrap(),
        ];
        assert_eq!(next_id_for(&tasks).unwrap(), 11);
    }

    #[test]
    fn next_id_stops_at_the_largest_storable_id() {
        let below = vec![Task::new(MAX_TASK_ID - 1, "almost").unwrap()];
        assert_eq!(next_id_for(&below).unwrap(), MAX_TASK_ID);

        let at_max = vec![Task::new(MAX_TASK_ID, "last").unwrap()];
        assert!(matches!(
            next_id_for(&at_max),
            Err(RepoError::IdsExhausted { max }) if max == MAX_TASK_ID
        ));
    }

    #[test]
    fn staging_path_is_a_sibling() {
        assert_eq!(
            staging_path(&PathBuf::from("data/tasks.json")),
            PathBuf::from("data/tasks.json.tmp")
        );
    }
}
