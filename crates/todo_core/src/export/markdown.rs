//! Markdown list export.

use super::{write_export, ExportFormat, ExportResult};
use crate::model::task::Task;
use std::path::{Path, PathBuf};

pub const MARKDOWN_HEADER: &str = "# 📝 To-Do List";
pub const MARKDOWN_EMPTY_LINE: &str = "_No tasks found._";

/// Header, blank line, then one bullet per task.
pub fn render_markdown(tasks: &[Task]) -> String {
    let mut out = format!("{MARKDOWN_HEADER}\n\n");
    if tasks.is_empty() {
        out.push_str(MARKDOWN_EMPTY_LINE);
        out.push('\n');
        return out;
    }
    for task in tasks {
        out.push_str(&task.to_markdown());
        out.push('\n');
    }
    out
}

pub fn export_markdown(tasks: &[Task], path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    write_export(
        ExportFormat::Markdown,
        path.as_ref(),
        &render_markdown(tasks),
        tasks.len(),
    )
}
