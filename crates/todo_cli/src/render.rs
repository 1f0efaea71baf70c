//! Plain-text task table.

use todo_core::{filter_tasks, Task, TaskFilter};

const HEADERS: [&str; 6] = ["ID", "Title", "Priority", "Due", "Tags", "Status"];

/// Renders `tasks` as a titled, column-aligned table.
pub fn task_table(title: &str, tasks: &[Task]) -> String {
    let rows: Vec<[String; 6]> = tasks.iter().map(row).collect();

    let mut widths = HEADERS.map(|header| header.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!("{title}\n");
    push_line(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_line(&mut out, row, &widths);
    }
    out
}

/// Filters an already loaded collection and renders the outcome.
pub fn search_report(tasks: Vec<Task>, filter: &TaskFilter) -> String {
    if tasks.is_empty() {
        return "No tasks found to search.\n".to_string();
    }
    let found = filter_tasks(tasks, filter);
    if found.is_empty() {
        "No matching tasks found.\n".to_string()
    } else {
        task_table("Filtered Tasks", &found)
    }
}

fn row(task: &Task) -> [String; 6] {
    [
        task.id.to_string(),
        task.title.clone(),
        task.priority.to_string(),
        task.due_date
            .map(|due| due.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string()),
        if task.tags.is_empty() {
            "-".to_string()
        } else {
            task.tags.join(", ")
        },
        task.status_icon().to_string(),
    ]
}

fn push_line(out: &mut String, cells: &[String; 6], widths: &[usize; 6]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| {
            let pad = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(pad))
        })
        .collect();
    out.push_str(padded.join(" | ").trim_end());
    out.push('\n');
}
