//! JSON array export.

use super::{write_export, ExportFormat, ExportResult};
use crate::model::task::{to_pretty_json, Task};
use std::path::{Path, PathBuf};

/// Pretty-printed array of each task's record view.
pub fn render_json(tasks: &[Task]) -> ExportResult<String> {
    let records = tasks.iter().map(Task::to_record).collect::<Vec<_>>();
    Ok(to_pretty_json(&records)?)
}

pub fn export_json(tasks: &[Task], path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    let body = render_json(tasks)?;
    write_export(ExportFormat::Json, path.as_ref(), &body, tasks.len())
}
