//! Task exporters.
//!
//! # Responsibility
//! - Render a task list to Markdown, CSV or JSON text.
//! - Write the rendered text to one file and return its path.
//!
//! # Invariants
//! - Exporters never filter, sort or validate; output follows input order.
//! - Empty input still produces a well-formed file.

pub mod csv;
pub mod json;
pub mod markdown;

use crate::model::task::Task;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub use self::csv::{export_csv, render_csv};
pub use self::json::{export_json, render_json};
pub use self::markdown::{export_markdown, render_markdown};

pub type ExportResult<T> = Result<T, ExportError>;

/// Export-layer error for rendering and file output.
#[derive(Debug)]
pub enum ExportError {
    Io { path: PathBuf, source: io::Error },
    Serialize(serde_json::Error),
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
            Self::Serialize(err) => write!(f, "failed to serialize export: {err}"),
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Supported export targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Markdown,
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// File name used when the caller does not pick one.
    pub fn default_file_name(self) -> &'static str {
        match self {
            Self::Markdown => "tasks.md",
            Self::Csv => "tasks.csv",
            Self::Json => "tasks.json",
        }
    }
}

impl Display for ExportFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "md" | "markdown" => Ok(Self::Markdown),
            "csv" => Ok(Self::Csv),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unsupported export format `{other}`; expected md|csv|json"
            )),
        }
    }
}

/// Renders `tasks` in `format` and writes them to `path`.
pub fn export(
    format: ExportFormat,
    tasks: &[Task],
    path: impl AsRef<Path>,
) -> ExportResult<PathBuf> {
    match format {
        ExportFormat::Markdown => export_markdown(tasks, path),
        ExportFormat::Csv => export_csv(tasks, path),
        ExportFormat::Json => export_json(tasks, path),
    }
}

/// Writes rendered output once, creating parent directories.
pub(crate) fn write_export(
    format: ExportFormat,
    path: &Path,
    body: &str,
    count: usize,
) -> ExportResult<PathBuf> {
    let written = match path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
        Some(parent) => fs::create_dir_all(parent).and_then(|()| fs::write(path, body)),
        None => fs::write(path, body),
    };

    match written {
        Ok(()) => {
            info!(
                "event=tasks_export module=export status=ok format={} count={}",
                format, count
            );
            Ok(path.to_path_buf())
        }
        Err(source) => {
            error!(
                "event=tasks_export module=export status=error format={} error={}",
                format, source
            );
            Err(ExportError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    }
}
