//! Command-line interface for taskdeck
//!
//! This module defines the CLI structure using clap derive macros.
//! Each subcommand is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::project::{Project, ProjectService, ProjectStore};
use crate::storage::Storage;
use crate::task::{TaskService, TaskStore};

mod project;
mod search;
mod task;

/// taskdeck - task and project tracking
///
/// Stores projects and their tasks, with filtering, tagging, sorting, and a
/// small query language for ad-hoc search.
#[derive(Parser, Debug)]
#[command(name = "taskdeck")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TASKDECK_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Search tasks with the query mini-language
    Search {
        /// Query words; `key:value` tokens (priority:, status:, project:,
        /// due:before:<date>, due:after:<date>) become predicates, the rest
        /// is free-text search over title and description
        #[arg(required = true)]
        query: Vec<String>,

        /// Comma-separated tags; matching tasks carry at least one
        #[arg(long)]
        tags: Option<String>,

        /// Sort key: created_at, due_date, priority, title
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort order: asc, desc
        #[arg(long)]
        order: Option<String>,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project
    New {
        /// Project name
        name: String,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
    },

    /// List projects
    List {
        /// Include archived projects
        #[arg(long)]
        all: bool,
    },

    /// Show a project
    Show {
        /// Project id or name
        reference: String,
    },

    /// Archive a project; its tasks are archived with it
    Archive {
        /// Project id or name
        reference: String,
    },
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task in a project
    New {
        /// Project id or name
        project: String,

        /// Task title
        title: String,

        /// Free-text description
        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,

        /// Parent task id (must belong to the same project)
        #[arg(long)]
        parent: Option<String>,

        /// Initial status (defaults to todo)
        #[arg(long)]
        status: Option<String>,
    },

    /// List tasks
    List {
        /// Restrict to one project (id or name)
        #[arg(long)]
        project: Option<String>,

        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by priority
        #[arg(long)]
        priority: Option<String>,

        /// Comma-separated tags; matching tasks carry at least one
        #[arg(long)]
        tags: Option<String>,

        /// Only tasks that are a parent of some task
        #[arg(long, conflicts_with = "no_subtasks")]
        has_subtasks: bool,

        /// Only tasks that are not a parent of any task
        #[arg(long)]
        no_subtasks: bool,

        /// Include archived tasks and tasks of archived projects
        #[arg(long)]
        all: bool,

        /// Sort key: created_at, due_date, priority, title
        #[arg(long)]
        sort_by: Option<String>,

        /// Sort order: asc, desc
        #[arg(long)]
        order: Option<String>,
    },

    /// Show a task
    Show {
        /// Task id
        id: String,
    },

    /// Edit task fields; omitted fields stay unchanged
    Edit {
        /// Task id
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Priority: low, medium, high
        #[arg(long)]
        priority: Option<String>,

        /// Due date (RFC 3339 or YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// Comma-separated tags (replaces the current list)
        #[arg(long)]
        tags: Option<String>,
    },

    /// Move a task to a status
    Move {
        /// Task id
        id: String,

        /// Target status: todo, pending, completed, archived
        status: String,
    },

    /// Archive a task (same as moving it to archived)
    Archive {
        /// Task id
        id: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let data_dir = self.data_dir;
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Project(command) => match command {
                ProjectCommands::New {
                    name,
                    description,
                    tags,
                } => project::run_new(project::NewOptions {
                    name,
                    description,
                    tags,
                    data_dir,
                    json,
                    quiet,
                }),
                ProjectCommands::List { all } => project::run_list(project::ListOptions {
                    all,
                    data_dir,
                    json,
                    quiet,
                }),
                ProjectCommands::Show { reference } => project::run_show(project::ShowOptions {
                    reference,
                    data_dir,
                    json,
                    quiet,
                }),
                ProjectCommands::Archive { reference } => {
                    project::run_archive(project::ArchiveOptions {
                        reference,
                        data_dir,
                        json,
                        quiet,
                    })
                }
            },
            Commands::Task(command) => match command {
                TaskCommands::New {
                    project,
                    title,
                    description,
                    priority,
                    due,
                    tags,
                    parent,
                    status,
                } => task::run_new(task::NewOptions {
                    project,
                    title,
                    description,
                    priority,
                    due,
                    tags,
                    parent,
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::List {
                    project,
                    status,
                    priority,
                    tags,
                    has_subtasks,
                    no_subtasks,
                    all,
                    sort_by,
                    order,
                } => task::run_list(task::ListOptions {
                    project,
                    status,
                    priority,
                    tags,
                    has_subtasks,
                    no_subtasks,
                    all,
                    sort_by,
                    order,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    tags,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    tags,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Move { id, status } => task::run_move(task::MoveOptions {
                    id,
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Archive { id } => task::run_archive(task::ArchiveOptions {
                    id,
                    data_dir,
                    json,
                    quiet,
                }),
            },
            Commands::Search {
                query,
                tags,
                sort_by,
                order,
            } => search::run_search(search::SearchOptions {
                query: query.join(" "),
                tags,
                sort_by,
                order,
                data_dir,
                json,
                quiet,
            }),
        }
    }
}

pub(crate) struct Services {
    pub config: Config,
    pub projects: ProjectService,
    pub tasks: TaskService,
}

/// Build the service stack for one command invocation: config from the
/// working directory, storage handle on the resolved data dir, services
/// wired together.
pub(crate) fn open_services(data_dir: Option<PathBuf>) -> Result<Services> {
    let cwd = std::env::current_dir()?;
    let config = Config::load(&cwd)?;
    let resolved = config.resolve_data_dir(data_dir.as_deref())?;
    let storage = Storage::new(resolved);
    let task_store = TaskStore::new(storage.clone());
    let projects = ProjectService::new(ProjectStore::new(storage), task_store.clone());
    let tasks = TaskService::new(task_store, projects.clone());
    Ok(Services {
        config,
        projects,
        tasks,
    })
}

/// Resolve a project reference: id first, then exact name. Names are not
/// unique, so a name lookup returns the first match.
pub(crate) fn resolve_project(projects: &ProjectService, reference: &str) -> Result<Project> {
    match projects.get_by_id(reference) {
        Ok(project) => Ok(project),
        Err(Error::ProjectNotFound(_)) => projects
            .get_by_name(reference)?
            .ok_or_else(|| Error::ProjectNotFound(reference.to_string())),
        Err(err) => Err(err),
    }
}
