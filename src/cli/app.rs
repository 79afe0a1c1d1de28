//! Main CLI application structure

use std::io;
use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};

use super::output::{Output, OutputFormat};
use super::prompt::{self, Prompter};
use super::table::{self, Column};
use super::task::{self, Report};
use crate::domain::{MatchMode, Priority, Query, Status, Task, TaskId, TaskInput, TaskStore};
use crate::storage::{Config, CsvExport, JsonStore};

#[derive(Parser)]
#[command(name = "tm")]
#[command(author, version, about = "Local task tracker for the command line")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "text")]
    pub format: OutputFormat,

    /// Enable verbose output for debugging
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Task file (overrides `data_file` from the config)
    #[arg(long, global = true, env = "TASKMAN_FILE")]
    pub file: Option<PathBuf>,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true, env = "TASKMAN_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task in one command
    Add {
        /// Task title
        title: String,

        /// Task description
        description: String,

        /// Task category
        category: String,

        /// Due date (e.g. 2024-12-10, 10.12.2024, "Dec 10 2024")
        due_date: String,

        /// Priority: 0 - Low, 1 - Medium, 2 - High
        priority: Priority,
    },

    /// Add a task interactively
    #[command(name = "add_inter", visible_alias = "add-inter")]
    AddInter,

    /// Mark tasks as completed
    Completed {
        /// Task IDs
        #[arg(required = true, num_args = 1..)]
        ids: Vec<TaskId>,
    },

    /// Show all incomplete tasks
    Current,

    /// Delete tasks by ID or by category
    #[command(name = "del")]
    Delete(DeleteArgs),

    /// Edit every field of a task in one command
    Edit {
        /// Task ID
        id: TaskId,

        /// Task title
        title: String,

        /// Task description
        description: String,

        /// Task category
        category: String,

        /// Due date
        due_date: String,

        /// Priority: 0 - Low, 1 - Medium, 2 - High
        priority: Priority,

        /// Status: 0 - Incomplete, 1 - Completed
        status: Status,
    },

    /// Edit a task interactively
    #[command(name = "edit_inter", visible_alias = "edit-inter")]
    EditInter {
        /// Task ID
        id: TaskId,
    },

    /// Export all tasks to a CSV file
    Csv {
        /// Output file (defaults to `csv_file` from the config)
        path: Option<PathBuf>,
    },

    /// Search tasks
    Search(SearchArgs),
}

/// Either IDs or categories, never both
#[derive(Args)]
#[group(required = true, multiple = false)]
pub struct DeleteArgs {
    /// Task IDs
    #[arg(short = 'i', long = "id", num_args = 1..)]
    pub ids: Vec<TaskId>,

    /// Categories (exact, case-insensitive)
    #[arg(short = 'c', long = "category", num_args = 1..)]
    pub categories: Vec<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Fragment of the title or description
    #[arg(short = 't', long)]
    pub text: Option<String>,

    /// Fragment of the category
    #[arg(short = 'c', long)]
    pub category: Option<String>,

    /// Status: 0 - Incomplete, 1 - Completed
    #[arg(short = 's', long)]
    pub status: Option<Status>,

    /// Require every given criterion to match (default: any of them)
    #[arg(short = 'i', long, visible_alias = "all")]
    pub inner: bool,
}

impl SearchArgs {
    fn query(&self) -> Query {
        let mode = if self.inner {
            MatchMode::All
        } else {
            MatchMode::Any
        };
        let mut query = Query::any().mode(mode);
        if let Some(text) = &self.text {
            query = query.text(text.as_str());
        }
        if let Some(category) = &self.category {
            query = query.category(category.as_str());
        }
        if let Some(status) = self.status {
            query = query.status(status);
        }
        query
    }
}

/// Main entry point for the CLI
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let output = Output::new(cli.format, cli.verbose);

    output.verbose("taskman starting");

    let config = Config::load(cli.config.as_deref())?;
    let data_file = cli.file.clone().unwrap_or_else(|| config.data_file.clone());
    output.verbose_ctx("config", &format!("Task file: {}", data_file.display()));

    let json = JsonStore::new(data_file);
    let mut store = json.load()?;
    output.verbose_ctx(
        "load",
        &format!("Loaded {} task(s), last ID {}", store.len(), store.last_id()),
    );

    let changed = dispatch(cli.command, &mut store, &config, &output)?;

    if changed {
        json.save(&store)?;
        output.verbose_ctx("save", &format!("Saved {} task(s) to {}", store.len(), json.path().display()));
    }

    output.verbose("Command completed successfully");
    Ok(())
}

/// Runs one command against the store; returns true if it needs saving
fn dispatch(command: Commands, store: &mut TaskStore, config: &Config, output: &Output) -> Result<bool> {
    let report = match command {
        Commands::Add {
            title,
            description,
            category,
            due_date,
            priority,
        } => {
            let input = TaskInput::new(title, description, category, due_date, priority);
            task::add(store, &input)
        }

        Commands::AddInter => {
            let stdin = io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), io::stderr());
            match prompt::new_task(&mut prompter)? {
                Some(input) => task::add(store, &input),
                None => Report::message("Adding the task was cancelled."),
            }
        }

        Commands::Completed { ids } => task::complete(store, &ids),

        Commands::Current => {
            let tasks = task::current(store);
            output.verbose_ctx("current", &format!("{} incomplete task(s)", tasks.len()));
            show_tasks(output, config, &tasks, "Current tasks", &[Column::Status], "No current tasks.");
            return Ok(false);
        }

        Commands::Delete(DeleteArgs { ids, categories }) => {
            if !ids.is_empty() {
                task::delete_ids(store, &ids)
            } else {
                task::delete_categories(store, &categories)
            }
        }

        Commands::Edit {
            id,
            title,
            description,
            category,
            due_date,
            priority,
            status,
        } => {
            let input =
                TaskInput::new(title, description, category, due_date, priority).with_status(status);
            task::edit(store, id, &input)
        }

        Commands::EditInter { id } => match store.find_by_id(id).cloned() {
            None => Report::message(format!("Task with ID {} not found.", id)),
            Some(current) => {
                let stdin = io::stdin();
                let mut prompter = Prompter::new(stdin.lock(), io::stderr());
                match prompt::edit_task(&mut prompter, &current)? {
                    Some(input) => task::edit(store, id, &input),
                    None => Report::message("Editing the task was cancelled."),
                }
            }
        },

        Commands::Csv { path } => {
            let path = path.unwrap_or_else(|| config.csv_file.clone());
            output.verbose_ctx("csv", &format!("Exporting to {}", path.display()));
            task::export_csv(store, &CsvExport::new(path))?
        }

        Commands::Search(args) => {
            let query = args.query();
            output.verbose_ctx("search", &format!("{:?}", query));
            let tasks = task::search(store, &query);
            output.verbose_ctx("search", &format!("Found {} task(s)", tasks.len()));
            show_tasks(
                output,
                config,
                &tasks,
                "Search results",
                &[],
                "No tasks match the search criteria.",
            );
            return Ok(false);
        }
    };

    output.report(&report);
    Ok(report.changed())
}

/// Prints a task listing as a table, a JSON array or an empty-result message
fn show_tasks(
    output: &Output,
    config: &Config,
    tasks: &[&Task],
    caption: &str,
    hidden: &[Column],
    empty: &str,
) {
    if output.is_json() {
        output.data(&tasks);
    } else if tasks.is_empty() {
        output.success(empty);
    } else {
        println!("{}", table::render(tasks, caption, hidden, &config.table));
    }
}
