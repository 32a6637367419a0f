//! Project entities and lifecycle.
//!
//! Projects group tasks. A project is created active, becomes archived at
//! most once, and is never deleted; archiving cascades to the project's
//! tasks (see [`ProjectService::archive`]).

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::error::{Error, Result};
use crate::normalize;
use crate::storage::Storage;
use crate::task::{Task, TaskStatus, TaskStore};

const PROJECT_ID_PREFIX: &str = "prj";
const PROJECT_ID_SUFFIX_LEN: usize = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Persistence adapter for project records.
///
/// Records live in `projects.jsonl` in creation order; `create` appends,
/// which is what registers the record for `list_all`.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    storage: Storage,
}

impl ProjectStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn get_by_id(&self, id: &str) -> Result<Option<Project>> {
        Ok(self.list_all()?.into_iter().find(|project| project.id == id))
    }

    pub fn list_all(&self) -> Result<Vec<Project>> {
        self.storage.read_records(&self.storage.projects_file())
    }

    pub fn create(&self, project: &Project) -> Result<()> {
        let path = self.storage.projects_file();
        let project = project.clone();
        self.storage
            .update_records::<Project, _, _>(&path, move |records| {
                if records.iter().any(|existing| existing.id == project.id) {
                    return Err(Error::Validation(format!(
                        "project already exists: {}",
                        project.id
                    )));
                }
                records.push(project);
                Ok(())
            })
    }

    pub fn save(&self, project: &Project) -> Result<()> {
        let path = self.storage.projects_file();
        let project = project.clone();
        self.storage
            .update_records::<Project, _, _>(&path, move |records| {
                match records.iter().position(|existing| existing.id == project.id) {
                    Some(idx) => records[idx] = project,
                    None => records.push(project),
                }
                Ok(())
            })
    }
}

/// Project lifecycle operations.
///
/// Holds the project adapter plus a task adapter handle for the archive
/// cascade; both are injected at construction.
#[derive(Debug, Clone)]
pub struct ProjectService {
    store: ProjectStore,
    tasks: TaskStore,
}

impl ProjectService {
    pub fn new(store: ProjectStore, tasks: TaskStore) -> Self {
        Self { store, tasks }
    }

    /// Create a project from normalized input.
    pub fn create(
        &self,
        name: &str,
        description: Option<String>,
        tags: Vec<String>,
    ) -> Result<Project> {
        let name = normalize::clean_required("project name", name)?;
        let description = normalize::clean_optional(description);
        let tags = normalize::normalize_tags(tags);

        let existing: HashSet<String> = self
            .store
            .list_all()?
            .into_iter()
            .map(|project| project.id)
            .collect();
        let now = Utc::now();
        let project = Project {
            id: generate_project_id(&existing),
            name,
            description,
            tags,
            archived: false,
            created_at: now,
            updated_at: now,
        };
        self.store.create(&project)?;
        Ok(project)
    }

    /// List projects ascending by creation time; archived ones are dropped
    /// unless requested. Creation-time ties keep store order, so repeated
    /// calls over the same data return the same sequence.
    pub fn list(&self, include_archived: bool) -> Result<Vec<Project>> {
        let mut projects = self.store.list_all()?;
        if !include_archived {
            projects.retain(|project| !project.archived);
        }
        projects.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        Ok(projects)
    }

    pub fn get_by_id(&self, id: &str) -> Result<Project> {
        self.store
            .get_by_id(id)?
            .ok_or_else(|| Error::ProjectNotFound(id.to_string()))
    }

    /// Exact-name lookup over all projects, archived included.
    ///
    /// Names are not unique; the first match in store order wins.
    pub fn get_by_name(&self, name: &str) -> Result<Option<Project>> {
        Ok(self
            .store
            .list_all()?
            .into_iter()
            .find(|project| project.name == name))
    }

    /// Like [`get_by_id`](Self::get_by_id) but fails with a conflict when
    /// the project is archived. Every task mutation goes through this check.
    pub fn ensure_active(&self, id: &str) -> Result<Project> {
        let project = self.get_by_id(id)?;
        if project.archived {
            return Err(Error::Conflict(format!("project is archived: {}", project.id)));
        }
        Ok(project)
    }

    /// Archive a project and cascade to its tasks.
    ///
    /// Idempotent: an already-archived project is returned untouched. The
    /// project record is durable before the cascade runs; the task batch is
    /// all-or-nothing but not atomic with the project write, so a crash in
    /// between can leave non-archived tasks under an archived project.
    pub fn archive(&self, id: &str) -> Result<Project> {
        let mut project = self.get_by_id(id)?;
        if project.archived {
            return Ok(project);
        }

        let now = Utc::now();
        project.archived = true;
        project.updated_at = now;
        self.store.save(&project)?;

        let mut cascade: Vec<Task> = self
            .tasks
            .list_by_project(&project.id)?
            .into_iter()
            .filter(|task| !task.archived)
            .collect();
        for task in &mut cascade {
            task.status = TaskStatus::Archived;
            task.archived = true;
            task.updated_at = now;
        }
        if !cascade.is_empty() {
            self.tasks.save_many(&cascade)?;
        }
        Ok(project)
    }
}

fn generate_project_id(existing: &HashSet<String>) -> String {
    loop {
        let raw = Ulid::new().to_string().to_ascii_lowercase();
        let candidate = format!(
            "{PROJECT_ID_PREFIX}-{}",
            &raw[raw.len() - PROJECT_ID_SUFFIX_LEN..]
        );
        if !existing.contains(&candidate) {
            return candidate;
        }
    }
}
