//! taskdeck task command implementations.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::cli::{open_services, resolve_project, Services};
use crate::error::{Error, Result};
use crate::normalize;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{
    CreateTaskRequest, SortKey, SortOrder, Task, TaskFilter, TaskPriority, TaskStatus,
    UpdateTaskRequest,
};

pub struct NewOptions {
    pub project: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub tags: Option<String>,
    pub parent: Option<String>,
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub project: Option<String>,
    pub status: Option<String>,
    pub priority: Option<String>,
    pub tags: Option<String>,
    pub has_subtasks: bool,
    pub no_subtasks: bool,
    pub all: bool,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub tags: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct MoveOptions {
    pub id: String,
    pub status: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ArchiveOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct TaskListOutput {
    total: usize,
    tasks: Vec<Task>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let project = resolve_project(&services.projects, &options.project)?;

    let task = services.tasks.create(CreateTaskRequest {
        project_id: project.id,
        title: options.title,
        description: options.description,
        priority: parse_priority(options.priority.as_deref())?,
        due_date: parse_due(options.due.as_deref())?,
        tags: options
            .tags
            .as_deref()
            .map(normalize::parse_tag_list)
            .unwrap_or_default(),
        parent_task_id: options.parent,
        status: parse_status(options.status.as_deref())?,
    })?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.as_str());
    human.push_summary("Project", task.project_id.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task new",
        &task,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let project_id = match options.project.as_deref() {
        Some(reference) => Some(resolve_project(&services.projects, reference)?.id),
        None => None,
    };

    let filter = TaskFilter {
        project_id,
        status: parse_status(options.status.as_deref())?,
        priority: parse_priority(options.priority.as_deref())?,
        tags: options
            .tags
            .as_deref()
            .map(normalize::parse_tag_list)
            .unwrap_or_default(),
        has_subtasks: subtask_filter(options.has_subtasks, options.no_subtasks),
        include_archived: options.all,
        sort_by: parse_sort_by(&services, options.sort_by.as_deref())?,
        order: parse_order(&services, options.order.as_deref())?,
    };
    let tasks = services.tasks.list(&filter)?;

    let output = TaskListOutput {
        total: tasks.len(),
        tasks,
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", output.total.to_string());
    for task in &output.tasks {
        human.push_detail(task_line(task));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let task = services.tasks.get(&options.id)?;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    human.push_summary("Title", task.title.clone());
    human.push_summary("Status", task.status.as_str());
    human.push_summary("Project", task.project_id.clone());
    if let Some(priority) = task.priority {
        human.push_summary("Priority", priority.as_str());
    }
    if let Some(due) = task.due_date {
        human.push_summary("Due", due.to_rfc3339());
    }
    if !task.tags.is_empty() {
        human.push_summary("Tags", task.tags.join(", "));
    }
    if let Some(parent) = task.parent_task_id.as_ref() {
        human.push_summary("Parent", parent.clone());
    }
    if let Some(description) = task.description.as_ref() {
        human.push_detail(description.clone());
    }
    human.push_summary("Created", task.created_at.to_rfc3339());
    human.push_summary("Updated", task.updated_at.to_rfc3339());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &task,
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;

    if options.title.is_none()
        && options.description.is_none()
        && options.priority.is_none()
        && options.due.is_none()
        && options.tags.is_none()
    {
        return Err(Error::Validation(
            "task edit requires at least one field to change".to_string(),
        ));
    }

    let task = services.tasks.update(
        &options.id,
        UpdateTaskRequest {
            title: options.title,
            description: options.description,
            priority: parse_priority(options.priority.as_deref())?,
            due_date: parse_due(options.due.as_deref())?,
            tags: options.tags.as_deref().map(normalize::parse_tag_list),
        },
    )?;

    let mut human = HumanOutput::new("Task updated");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Title", task.title.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task edit",
        &task,
        Some(&human),
    )
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let status = TaskStatus::parse(&options.status)?;
    let task = services.tasks.move_task(&options.id, status)?;

    let mut human = HumanOutput::new("Task moved");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Status", task.status.as_str());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task move",
        &task,
        Some(&human),
    )
}

pub fn run_archive(options: ArchiveOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let task = services.tasks.archive(&options.id)?;

    let mut human = HumanOutput::new("Task archived");
    human.push_summary("ID", task.id.clone());
    human.push_summary("Status", task.status.as_str());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task archive",
        &task,
        Some(&human),
    )
}

pub(crate) fn task_line(task: &Task) -> String {
    let priority = task.priority.map(TaskPriority::as_str).unwrap_or("-");
    let mut line = format!(
        "[{}][{}] {} {}",
        task.status.as_str(),
        priority,
        task.id,
        task.title
    );
    if !task.tags.is_empty() {
        line.push_str(&format!(" ({})", task.tags.join(", ")));
    }
    line
}

fn parse_status(value: Option<&str>) -> Result<Option<TaskStatus>> {
    value.map(TaskStatus::parse).transpose()
}

fn parse_priority(value: Option<&str>) -> Result<Option<TaskPriority>> {
    value.map(TaskPriority::parse).transpose()
}

fn parse_due(value: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    value.map(normalize::parse_due_date).transpose()
}

fn subtask_filter(has_subtasks: bool, no_subtasks: bool) -> Option<bool> {
    if has_subtasks {
        Some(true)
    } else if no_subtasks {
        Some(false)
    } else {
        None
    }
}

fn parse_sort_by(services: &Services, value: Option<&str>) -> Result<SortKey> {
    match value {
        Some(value) => SortKey::parse(value),
        None => Ok(services.config.list.sort_by),
    }
}

fn parse_order(services: &Services, value: Option<&str>) -> Result<SortOrder> {
    match value {
        Some(value) => SortOrder::parse(value),
        None => Ok(services.config.list.order),
    }
}
