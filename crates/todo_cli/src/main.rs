//! `todo` command-line entry point.
//!
//! # Responsibility
//! - Parse arguments and call one `todo_core` use case per invocation.
//! - Render results as plain text; all task rules live in core.

mod render;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use todo_core::{
    default_log_level, export, init_logging, ExportFormat, JsonTaskRepository, NewTask, Priority,
    StoreConfig, TaskFilter, TaskService, TaskUpdate,
};

/// Manage your tasks from the command line.
#[derive(Parser)]
#[command(name = "todo")]
#[command(about = "Add, list, update, complete, delete, search and export tasks")]
#[command(version)]
struct Cli {
    /// Task collection file
    #[arg(
        long,
        global = true,
        env = "TODO_DATA_FILE",
        default_value = todo_core::config::DEFAULT_DATA_FILE
    )]
    data_file: PathBuf,

    /// Directory for exported files
    #[arg(
        long,
        global = true,
        env = "TODO_EXPORT_DIR",
        default_value = todo_core::config::DEFAULT_EXPORT_DIR
    )]
    export_dir: PathBuf,

    /// Enable rolling file logs in this directory
    #[arg(long, global = true, env = "TODO_LOG_DIR")]
    log_dir: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error)
    #[arg(long, global = true, env = "TODO_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage your tasks
    #[command(subcommand)]
    Tasks(TaskCommand),

    /// Search or filter tasks
    #[command(subcommand)]
    Search(SearchCommand),

    /// Export tasks to Markdown, CSV or JSON
    #[command(subcommand)]
    Export(ExportCommand),
}

#[derive(Subcommand)]
enum TaskCommand {
    /// Add a new task
    Add {
        title: String,

        #[arg(long, default_value = "medium")]
        priority: Priority,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Tag to attach; repeat for more, e.g. --tags work --tags coding
        #[arg(long)]
        tags: Vec<String>,
    },

    /// List all tasks
    List {
        /// Hide tasks that are already completed
        #[arg(long)]
        hide_completed: bool,
    },

    /// Update an existing task
    Update {
        id: u64,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Replace tags completely; repeat for more than one
        #[arg(long)]
        tags: Vec<String>,
    },

    /// Mark a task as completed
    Complete { id: u64 },

    /// Delete a task permanently
    Delete { id: u64 },
}

#[derive(Subcommand)]
enum SearchCommand {
    /// Filter tasks by one or more criteria
    By {
        #[arg(long)]
        priority: Option<Priority>,

        #[arg(long)]
        tag: Option<String>,

        /// Keep tasks due strictly before this date (YYYY-MM-DD)
        #[arg(long)]
        due_before: Option<NaiveDate>,
    },
}

#[derive(Subcommand)]
enum ExportCommand {
    /// Export tasks as a Markdown file
    Md {
        /// File name inside the export directory [default: tasks.md]
        #[arg(long)]
        filename: Option<PathBuf>,
    },
    /// Export tasks as a CSV file
    Csv {
        /// File name inside the export directory [default: tasks.csv]
        #[arg(long)]
        filename: Option<PathBuf>,
    },
    /// Export tasks as a JSON file
    Json {
        /// File name inside the export directory [default: tasks.json]
        #[arg(long)]
        filename: Option<PathBuf>,
    },
}

impl ExportCommand {
    fn target(self) -> (ExportFormat, PathBuf) {
        let (format, filename) = match self {
            Self::Md { filename } => (ExportFormat::Markdown, filename),
            Self::Csv { filename } => (ExportFormat::Csv, filename),
            Self::Json { filename } => (ExportFormat::Json, filename),
        };
        let filename = filename.unwrap_or_else(|| PathBuf::from(format.default_file_name()));
        (format, filename)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, log_dir) {
            eprintln!("warning: file logging disabled: {err}");
        }
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::new(cli.data_file, cli.export_dir);
    let service = TaskService::new(JsonTaskRepository::from_config(&config));

    match cli.command {
        Commands::Tasks(command) => run_task_command(&service, command),
        Commands::Search(SearchCommand::By {
            priority,
            tag,
            due_before,
        }) => {
            let tasks = service.list_tasks(true)?;
            let filter = TaskFilter {
                priority,
                tag,
                due_before,
            };
            print!("{}", render::search_report(tasks, &filter));
            Ok(())
        }
        Commands::Export(command) => {
            let (format, filename) = command.target();
            let tasks = service.list_tasks(true)?;
            if tasks.is_empty() {
                println!("⚠ No tasks available to export.");
                return Ok(());
            }
            let path = export(format, &tasks, config.export_path(filename))?;
            println!("✅ Exported tasks to {format}: {}", path.display());
            Ok(())
        }
    }
}

fn run_task_command(
    service: &TaskService<JsonTaskRepository>,
    command: TaskCommand,
) -> Result<(), Box<dyn Error>> {
    match command {
        TaskCommand::Add {
            title,
            priority,
            due,
            tags,
        } => {
            let task = service.add_task(NewTask {
                title,
                priority,
                due_date: due.map(|date| date.and_time(chrono::NaiveTime::MIN)),
                tags,
            })?;
            println!("✅ Task added: {}", task.title);
        }
        TaskCommand::List { hide_completed } => {
            let tasks = service.list_tasks(!hide_completed)?;
            if tasks.is_empty() {
                println!("No tasks found.");
            } else {
                print!("{}", render::task_table("To-Do List", &tasks));
            }
        }
        TaskCommand::Update {
            id,
            title,
            priority,
            due,
            tags,
        } => {
            let update = TaskUpdate {
                title,
                priority,
                due_date: due.map(|date| date.and_time(chrono::NaiveTime::MIN)),
                tags: Some(tags),
            };
            match service.update_task(id, update)? {
                Some(_) => println!("✏️ Task {id} updated."),
                None => println!("Task with ID {id} not found."),
            }
        }
        TaskCommand::Complete { id } => match service.complete_task(id)? {
            Some(_) => println!("🎉 Task {id} marked as complete!"),
            None => println!("Task with ID {id} not found."),
        },
        TaskCommand::Delete { id } => match service.delete_task(id)? {
            Some(_) => println!("🗑️ Task {id} deleted."),
            None => println!("Task with ID {id} not found."),
        },
    }
    Ok(())
}
