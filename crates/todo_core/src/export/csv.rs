//! CSV export.
//!
//! Rows use `\r\n` terminators. Fields are quoted only when they contain a
//! comma, a double quote or a line break; embedded quotes are doubled.

use super::{write_export, ExportFormat, ExportResult};
use crate::model::task::{Task, CREATED_AT_FORMAT, DUE_DATE_FORMAT};
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const CSV_COLUMNS: [&str; 7] = [
    "id",
    "title",
    "priority",
    "due_date",
    "tags",
    "completed",
    "created_at",
];

const ROW_TERMINATOR: &str = "\r\n";

/// Header row followed by one row per task.
pub fn render_csv(tasks: &[Task]) -> String {
    let mut out = String::new();
    push_row(&mut out, CSV_COLUMNS.iter().map(|column| Cow::Borrowed(*column)));
    for task in tasks {
        push_row(&mut out, task_fields(task).into_iter());
    }
    out
}

pub fn export_csv(tasks: &[Task], path: impl AsRef<Path>) -> ExportResult<PathBuf> {
    write_export(ExportFormat::Csv, path.as_ref(), &render_csv(tasks), tasks.len())
}

fn task_fields(task: &Task) -> [Cow<'_, str>; 7] {
    [
        Cow::Owned(task.id.to_string()),
        Cow::Borrowed(task.title.as_str()),
        Cow::Borrowed(task.priority.as_str()),
        task.due_date
            .map(|due| Cow::Owned(due.format(DUE_DATE_FORMAT).to_string()))
            .unwrap_or(Cow::Borrowed("")),
        Cow::Owned(task.tags.join(", ")),
        Cow::Borrowed(task.status_icon()),
        Cow::Owned(task.created_at.format(CREATED_AT_FORMAT).to_string()),
    ]
}

fn push_row<'a>(out: &mut String, fields: impl Iterator<Item = Cow<'a, str>>) {
    for (index, field) in fields.enumerate() {
        if index > 0 {
            out.push(',');
        }
        out.push_str(&quote_field(&field));
    }
    out.push_str(ROW_TERMINATOR);
}

fn quote_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::quote_field;

    #[test]
    fn quote_field_leaves_plain_values_alone() {
        assert_eq!(quote_field("plain"), "plain");
    }

    #[test]
    fn quote_field_wraps_commas_and_doubles_quotes() {
        assert_eq!(quote_field("work, urgent"), "\"work, urgent\"");
        assert_eq!(quote_field("say \"hi\""), "\"say \"\"hi\"\"\"");
        assert_eq!(quote_field("two\nlines"), "\"two\nlines\"");
    }
}
