//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical shape of a to-do task.
//! - Validate raw field input before a `Task` can exist.
//! - Provide the dictionary, Markdown and JSON views used by storage/export.
//!
//! # Invariants
//! - `id` is in `1..=MAX_TASK_ID`; uniqueness is owned by the repository's id policy.
//! - `title` holds 1..=255 characters.
//! - `tags` is always a list (null input normalizes to empty).
//! - `created_at` is set once and never rewritten by update paths.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Identifier assigned by the repository, never by the user.
pub type TaskId = u64;

/// Largest id that survives the signed wire format.
pub const MAX_TASK_ID: TaskId = i64::MAX as TaskId;

/// Maximum title length, counted in characters.
pub const MAX_TITLE_CHARS: usize = 255;

/// `due_date` wire format.
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";
/// `created_at` wire format (minute precision).
pub const CREATED_AT_FORMAT: &str = "%Y-%m-%d %H:%M";

const COMPLETED_ICON: &str = "✅";
const PENDING_ICON: &str = "❌";

/// Validation error raised when raw input cannot form a `Task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Required field was absent or null.
    MissingField(&'static str),
    /// Ids start at 1.
    NonPositiveId(i64),
    /// Ids above `MAX_TASK_ID` cannot be stored.
    IdOutOfRange(TaskId),
    EmptyTitle,
    TitleTooLong {
        chars: usize,
        max: usize,
    },
    InvalidPriority(String),
    InvalidDateTime {
        field: &'static str,
        value: String,
    },
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingField(field) => write!(f, "missing required field `{field}`"),
            Self::NonPositiveId(id) => write!(f, "task id must be positive, got {id}"),
            Self::IdOutOfRange(id) => {
                write!(f, "task id {id} exceeds the maximum of {MAX_TASK_ID}")
            }
            Self::EmptyTitle => write!(f, "title cannot be empty"),
            Self::TitleTooLong { chars, max } => {
                write!(f, "title has {chars} characters; maximum is {max}")
            }
            Self::InvalidPriority(value) => {
                write!(f, "invalid priority `{value}`; expected low|medium|high")
            }
            Self::InvalidDateTime { field, value } => {
                write!(f, "`{field}` is not a valid date/time: `{value}`")
            }
        }
    }
}

impl Error for TaskValidationError {}

/// Task priority level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// All levels in ascending order.
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Stable text used at serialization boundaries.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = TaskValidationError;

    /// Parses `low|medium|high`, ASCII case-insensitive.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|level| level.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| TaskValidationError::InvalidPriority(value.to_string()))
    }
}

/// Wire record for one task.
///
/// Every field is optional so that raw input (storage rows, CLI arguments)
/// can be checked field by field in `Task::try_from`. `Task::to_record`
/// always fills every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskRecord {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub priority: Option<String>,
    pub due_date: Option<String>,
    pub tags: Option<Vec<String>>,
    pub completed: Option<bool>,
    pub created_at: Option<String>,
}

/// Canonical to-do task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub priority: Priority,
    /// `None` means no due date.
    pub due_date: Option<NaiveDateTime>,
    pub tags: Vec<String>,
    pub completed: bool,
    /// Local wall-clock creation time.
    pub created_at: NaiveDateTime,
}

impl Task {
    /// Creates a task with default fields and `created_at = now`.
    ///
    /// # Errors
    /// - `NonPositiveId` when `id == 0`.
    /// - `IdOutOfRange` when `id > MAX_TASK_ID`.
    /// - `EmptyTitle` / `TitleTooLong` when the title is out of range.
    pub fn new(id: TaskId, title: impl Into<String>) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: title.into(),
            priority: Priority::default(),
            due_date: None,
            tags: Vec::new(),
            completed: false,
            created_at: now_minute(),
        };
        task.validate()?;
        Ok(task)
    }

    /// Validates invariants that public field mutation can break.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id == 0 {
            return Err(TaskValidationError::NonPositiveId(0));
        }
        if self.id > MAX_TASK_ID {
            return Err(TaskValidationError::IdOutOfRange(self.id));
        }
        validate_title(&self.title)
    }

    /// Returns the serialization view: dates rendered as fixed-format text,
    /// every other field passed through.
    ///
    /// An id above `MAX_TASK_ID` has no wire form and is left out, so the
    /// record fails to load instead of colliding with another task.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            id: i64::try_from(self.id).ok(),
            title: Some(self.title.clone()),
            priority: Some(self.priority.as_str().to_string()),
            due_date: self
                .due_date
                .map(|due| due.format(DUE_DATE_FORMAT).to_string()),
            tags: Some(self.tags.clone()),
            completed: Some(self.completed),
            created_at: Some(self.created_at.format(CREATED_AT_FORMAT).to_string()),
        }
    }

    /// Renders one Markdown bullet line.
    ///
    /// Format: `- <icon> **<title>** (Priority: <p>, Due: <date>, Tags: <tags>)`.
    pub fn to_markdown(&self) -> String {
        let due = self
            .due_date
            .map(|due| due.format(DUE_DATE_FORMAT).to_string())
            .unwrap_or_else(|| "No due date".to_string());
        let tags = if self.tags.is_empty() {
            "None".to_string()
        } else {
            self.tags.join(", ")
        };
        format!(
            "- {} **{}** (Priority: {}, Due: {}, Tags: {})",
            self.status_icon(),
            self.title,
            self.priority,
            due,
            tags
        )
    }

    /// Pretty-printed JSON of `to_record()` with 4-space indentation.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        to_pretty_json(&self.to_record())
    }

    /// Completion icon shared by Markdown and CSV output.
    pub fn status_icon(&self) -> &'static str {
        if self.completed {
            COMPLETED_ICON
        } else {
            PENDING_ICON
        }
    }

    /// Case-insensitive tag membership.
    pub fn has_tag(&self, tag: &str) -> bool {
        let wanted = tag.to_lowercase();
        self.tags.iter().any(|value| value.to_lowercase() == wanted)
    }
}

impl TryFrom<TaskRecord> for Task {
    type Error = TaskValidationError;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        let raw_id = record.id.ok_or(TaskValidationError::MissingField("id"))?;
        let id = TaskId::try_from(raw_id)
            .ok()
            .filter(|id| *id > 0)
            .ok_or(TaskValidationError::NonPositiveId(raw_id))?;

        let title = record
            .title
            .ok_or(TaskValidationError::MissingField("title"))?;
        validate_title(&title)?;

        let priority = match record.priority {
            Some(value) => value.parse()?,
            None => Priority::default(),
        };

        let due_date = record
            .due_date
            .map(|value| parse_datetime("due_date", &value))
            .transpose()?;

        let created_at = match record.created_at {
            Some(value) => parse_datetime("created_at", &value)?,
            None => now_minute(),
        };

        Ok(Self {
            id,
            title,
            priority,
            due_date,
            tags: record.tags.unwrap_or_default(),
            completed: record.completed.unwrap_or(false),
            created_at,
        })
    }
}

impl From<Task> for TaskRecord {
    fn from(task: Task) -> Self {
        task.to_record()
    }
}

/// Checks the title length bounds (in characters, no trimming).
pub fn validate_title(title: &str) -> Result<(), TaskValidationError> {
    let chars = title.chars().count();
    if chars == 0 {
        return Err(TaskValidationError::EmptyTitle);
    }
    if chars > MAX_TITLE_CHARS {
        return Err(TaskValidationError::TitleTooLong {
            chars,
            max: MAX_TITLE_CHARS,
        });
    }
    Ok(())
}

/// Parses user or storage date/time text.
///
/// Accepts `YYYY-MM-DD` (midnight), `YYYY-MM-DD HH:MM[:SS]`, the same with a
/// `T` separator and optional fractional seconds, and RFC 3339 (kept as the
/// wall-clock value it names).
pub fn parse_datetime(
    field: &'static str,
    value: &str,
) -> Result<NaiveDateTime, TaskValidationError> {
    const DATETIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%dT%H:%M:%S%.f",
    ];

    let trimmed = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, DUE_DATE_FORMAT) {
        return Ok(date.and_time(NaiveTime::MIN));
    }
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.naive_local())
        .map_err(|_| TaskValidationError::InvalidDateTime {
            field,
            value: value.to_string(),
        })
}

/// Serializes with the 4-space pretty layout used by storage and export.
pub(crate) fn to_pretty_json<T: Serialize + ?Sized>(
    value: &T,
) -> Result<String, serde_json::Error> {
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value.serialize(&mut serializer)?;
    String::from_utf8(buffer).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

fn now_minute() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|value| value.with_nanosecond(0))
        .unwrap_or(now)
}
