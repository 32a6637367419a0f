//! Task entities, the status state machine, and the listing pipeline.
//!
//! A task belongs to exactly one project and moves freely among the four
//! statuses via [`TaskService::move_task`]; the `archived` flag is always
//! derived from the status. Listing runs a fixed pipeline: project-scope
//! resolution, archived-visibility filtering, attribute filtering, sort.

use std::cmp::Ordering;
use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::normalize;
use crate::project::ProjectService;
use crate::search::SearchQuery;
use crate::storage::Storage;

const TASK_ID_PREFIX: &str = "task";
const TASK_ID_SUFFIX_LEN: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    Pending,
    Completed,
    Archived,
}

impl TaskStatus {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "todo" => Ok(Self::Todo),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "archived" => Ok(Self::Archived),
            other => Err(Error::Validation(format!(
                "unknown task status '{other}' (expected todo, pending, completed, archived)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Archived => "archived",
        }
    }

    pub fn is_archived(self) -> bool {
        matches!(self, Self::Archived)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(Error::Validation(format!(
                "unknown task priority '{other}' (expected low, medium, high)"
            ))),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

// Unset priority sorts before low.
fn priority_rank(priority: Option<TaskPriority>) -> u8 {
    match priority {
        None => 0,
        Some(TaskPriority::Low) => 1,
        Some(TaskPriority::Medium) => 2,
        Some(TaskPriority::High) => 3,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortKey {
    #[default]
    CreatedAt,
    DueDate,
    Priority,
    Title,
}

impl SortKey {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "created_at" => Ok(Self::CreatedAt),
            "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "title" => Ok(Self::Title),
            other => Err(Error::Validation(format!(
                "unknown sort key '{other}' (expected created_at, due_date, priority, title)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(Error::Validation(format!(
                "unknown sort order '{other}' (expected asc, desc)"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub project_id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_task_id: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stable sort by the requested key; ties keep the incoming order.
///
/// A missing due date sorts as the maximum value (last ascending). Priority
/// ranks unset < low < medium < high. Titles compare case-insensitively.
pub fn sort_tasks(tasks: &mut [Task], sort_by: SortKey, order: SortOrder) {
    tasks.sort_by(|a, b| {
        let ordering = match sort_by {
            SortKey::CreatedAt => a.created_at.cmp(&b.created_at),
            SortKey::DueDate => match (a.due_date, b.due_date) {
                (Some(left), Some(right)) => left.cmp(&right),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            SortKey::Priority => priority_rank(a.priority).cmp(&priority_rank(b.priority)),
            SortKey::Title => a.title.to_lowercase().cmp(&b.title.to_lowercase()),
        };
        match order {
            SortOrder::Asc => ordering,
            SortOrder::Desc => ordering.reverse(),
        }
    });
}

/// Input for task creation; optional fields fall back to their defaults
/// (`status` to `todo`, `tags` to empty).
#[derive(Debug, Clone, Default)]
pub struct CreateTaskRequest {
    pub project_id: String,
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
    pub parent_task_id: Option<String>,
    pub status: Option<TaskStatus>,
}

/// Partial update: `None` means "leave unchanged". There is deliberately no
/// way to clear a field through this operation.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<Vec<String>>,
}

/// Listing pipeline parameters.
#[derive(Debug, Clone, Default)]
pub struct TaskFilter {
    pub project_id: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub tags: Vec<String>,
    pub has_subtasks: Option<bool>,
    pub include_archived: bool,
    pub sort_by: SortKey,
    pub order: SortOrder,
}

/// Persistence adapter for task records.
///
/// Records live in `tasks.jsonl` in creation order. `save_many` rewrites the
/// batch in a single atomic replace, so the cascade write is all-or-nothing.
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
}

impl TaskStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.list_all()?.into_iter().find(|task| task.id == id))
    }

    pub fn list_all(&self) -> Result<Vec<Task>> {
        self.storage.read_records(&self.storage.tasks_file())
    }

    pub fn list_by_project(&self, project_id: &str) -> Result<Vec<Task>> {
        Ok(self
            .list_all()?
            .into_iter()
            .filter(|task| task.project_id == project_id)
            .collect())
    }

    pub fn create(&self, task: &Task) -> Result<()> {
        let path = self.storage.tasks_file();
        let task = task.clone();
        self.storage.update_records::<Task, _, _>(&path, move |records| {
            if records.iter().any(|existing| existing.id == task.id) {
                return Err(Error::Validation(format!("task already exists: {}", task.id)));
            }
            records.push(task);
            Ok(())
        })
    }

    pub fn save(&self, task: &Task) -> Result<()> {
        self.save_many(std::slice::from_ref(task))
    }

    pub fn save_many(&self, tasks: &[Task]) -> Result<()> {
        let path = self.storage.tasks_file();
        let tasks = tasks.to_vec();
        self.storage.update_records::<Task, _, _>(&path, move |records| {
            for task in tasks {
                match records.iter().position(|existing| existing.id == task.id) {
                    Some(idx) => records[idx] = task,
                    None => records.push(task),
                }
            }
            Ok(())
        })
    }
}

/// Task lifecycle operations.
///
/// Consults the Project Service before any mutation so nothing under an
/// archived project can change.
#[derive(Debug, Clone)]
pub struct TaskService {
    store: TaskStore,
    projects: ProjectService,
}

impl TaskService {
    pub fn new(store: TaskStore, projects: ProjectService) -> Self {
        Self { store, projects }
    }

    pub fn create(&self, request: CreateTaskRequest) -> Result<Task> {
        self.projects.ensure_active(&request.project_id)?;
        let title = normalize::clean_required("task title", &request.title)?;
        let description = normalize::clean_optional(request.description);
        let tags = normalize::normalize_tags(request.tags);

        if let Some(parent_id) = request.parent_task_id.as_deref() {
            let parent = self.store.get_by_id(parent_id)?.ok_or_else(|| {
                Error::Validation(format!("parent task not found: {parent_id}"))
            })?;
            if parent.project_id != request.project_id {
                return Err(Error::Validation(format!(
                    "parent task {} belongs to a different project",
                    parent.id
                )));
            }
        }

        let status = request.status.unwrap_or(TaskStatus::Todo);
        let existing: HashSet<String> =
            self.store.list_all()?.into_iter().map(|task| task.id).collect();
        let now = Utc::now();
        let task = Task {
            id: generate_task_id(&existing),
            project_id: request.project_id,
            title,
            description,
            status,
            priority: request.priority,
            due_date: request.due_date,
            tags,
            parent_task_id: request.parent_task_id,
            archived: status.is_archived(),
            created_at: now,
            updated_at: now,
        };
        self.store.create(&task)?;
        Ok(task)
    }

    pub fn get(&self, task_id: &str) -> Result<Task> {
        self.store
            .get_by_id(task_id)?
            .ok_or_else(|| Error::TaskNotFound(task_id.to_string()))
    }

    /// Run the listing pipeline: scope resolution, archived-visibility
    /// filtering, attribute filtering, sort.
    pub fn list(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        // Scope resolution
        let mut tasks = match filter.project_id.as_deref() {
            Some(project_id) => {
                let project = self.projects.get_by_id(project_id)?;
                if project.archived && !filter.include_archived {
                    return Ok(Vec::new());
                }
                self.store.list_by_project(&project.id)?
            }
            None => self.store.list_all()?,
        };

        // Archived-visibility filtering
        if !filter.include_archived {
            tasks.retain(|task| !task.archived);
            if filter.project_id.is_none() {
                let active: HashSet<String> = self
                    .projects
                    .list(false)?
                    .into_iter()
                    .map(|project| project.id)
                    .collect();
                tasks.retain(|task| active.contains(&task.project_id));
            }
        }

        // Attribute filtering
        if let Some(status) = filter.status {
            tasks.retain(|task| task.status == status);
        }
        if let Some(priority) = filter.priority {
            tasks.retain(|task| task.priority == Some(priority));
        }
        if !filter.tags.is_empty() {
            let wanted = normalize::normalize_tags(filter.tags.iter());
            tasks.retain(|task| task.tags.iter().any(|tag| wanted.contains(tag)));
        }
        if let Some(has_subtasks) = filter.has_subtasks {
            // Parenthood is judged against the full task universe, not the
            // already-filtered subset.
            let parents: HashSet<String> = self
                .store
                .list_all()?
                .into_iter()
                .filter_map(|task| task.parent_task_id)
                .collect();
            tasks.retain(|task| parents.contains(&task.id) == has_subtasks);
        }

        sort_tasks(&mut tasks, filter.sort_by, filter.order);
        Ok(tasks)
    }

    pub fn update(&self, task_id: &str, request: UpdateTaskRequest) -> Result<Task> {
        let mut task = self.get(task_id)?;
        self.projects.ensure_active(&task.project_id)?;

        if let Some(title) = request.title {
            task.title = normalize::clean_required("task title", &title)?;
        }
        if let Some(description) = request.description {
            // An empty description would be a clear, which this operation
            // does not support.
            task.description = Some(normalize::clean_required("task description", &description)?);
        }
        if let Some(priority) = request.priority {
            task.priority = Some(priority);
        }
        if let Some(due_date) = request.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(tags) = request.tags {
            task.tags = normalize::normalize_tags(tags);
        }

        task.updated_at = Utc::now();
        self.store.save(&task)?;
        Ok(task)
    }

    pub fn move_task(&self, task_id: &str, status: TaskStatus) -> Result<Task> {
        let mut task = self.get(task_id)?;
        self.projects.ensure_active(&task.project_id)?;

        task.status = status;
        task.archived = status.is_archived();
        task.updated_at = Utc::now();
        self.store.save(&task)?;
        Ok(task)
    }

    pub fn archive(&self, task_id: &str) -> Result<Task> {
        self.move_task(task_id, TaskStatus::Archived)
    }

    /// Evaluate a search query against the default listing, then apply the
    /// requested sort. See [`SearchQuery`] for the grammar.
    pub fn search(
        &self,
        query: &str,
        tags: &[String],
        sort_by: SortKey,
        order: SortOrder,
    ) -> Result<Vec<Task>> {
        let parsed = SearchQuery::parse(query);
        let mut tasks = self.list(&TaskFilter::default())?;

        if let Some(needle) = parsed.project.as_deref() {
            let scope: HashSet<String> = self
                .projects
                .list(true)?
                .into_iter()
                .filter(|project| {
                    project.id == needle || project.name.eq_ignore_ascii_case(needle)
                })
                .map(|project| project.id)
                .collect();
            tasks.retain(|task| scope.contains(&task.project_id));
        }
        tasks.retain(|task| parsed.matches(task));

        let wanted = normalize::normalize_tags(tags.iter());
        if !wanted.is_empty() {
            tasks.retain(|task| task.tags.iter().any(|tag| wanted.contains(tag)));
        }

        sort_tasks(&mut tasks, sort_by, order);
        Ok(tasks)
    }
}

fn generate_task_id(existing: &HashSet<String>) -> String {
    loop {
        let raw = Ulid::new().to_string().to_ascii_lowercase();
        let candidate = format!(
            "{TASK_ID_PREFIX}-{}",
            &raw[raw.len() - TASK_ID_SUFFIX_LEN..]
        );
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}
