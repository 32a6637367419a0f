//! taskdeck project command implementations.

use std::path::PathBuf;

use crate::cli::{open_services, resolve_project};
use crate::error::Result;
use crate::normalize;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::project::Project;

pub struct NewOptions {
    pub name: String,
    pub description: Option<String>,
    pub tags: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub all: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub reference: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ArchiveOptions {
    pub reference: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct ProjectListOutput {
    total: usize,
    projects: Vec<Project>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let tags = options
        .tags
        .as_deref()
        .map(normalize::parse_tag_list)
        .unwrap_or_default();
    let project = services
        .projects
        .create(&options.name, options.description, tags)?;

    let mut human = HumanOutput::new("Project created");
    human.push_summary("ID", project.id.clone());
    human.push_summary("Name", project.name.clone());
    if let Some(description) = project.description.as_ref() {
        human.push_summary("Description", description.clone());
    }
    if !project.tags.is_empty() {
        human.push_summary("Tags", project.tags.join(", "));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project new",
        &project,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let projects = services.projects.list(options.all)?;
    let output = ProjectListOutput {
        total: projects.len(),
        projects,
    };

    let mut human = HumanOutput::new("Projects");
    human.push_summary("Total", output.total.to_string());
    for project in &output.projects {
        let mut line = format!("{} {}", project.id, project.name);
        if !project.tags.is_empty() {
            line.push_str(&format!(" [{}]", project.tags.join(", ")));
        }
        if project.archived {
            line.push_str(" [archived]");
        }
        human.push_detail(line);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let project = resolve_project(&services.projects, &options.reference)?;

    let mut human = HumanOutput::new(format!("Project {}", project.id));
    human.push_summary("Name", project.name.clone());
    if let Some(description) = project.description.as_ref() {
        human.push_summary("Description", description.clone());
    }
    if !project.tags.is_empty() {
        human.push_summary("Tags", project.tags.join(", "));
    }
    human.push_summary("Archived", project.archived.to_string());
    human.push_summary("Created", project.created_at.to_rfc3339());
    human.push_summary("Updated", project.updated_at.to_rfc3339());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project show",
        &project,
        Some(&human),
    )
}

pub fn run_archive(options: ArchiveOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let resolved = resolve_project(&services.projects, &options.reference)?;
    let already = resolved.archived;
    let project = services.projects.archive(&resolved.id)?;

    let mut human = HumanOutput::new(if already {
        "Project already archived"
    } else {
        "Project archived"
    });
    human.push_summary("ID", project.id.clone());
    human.push_summary("Name", project.name.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project archive",
        &project,
        Some(&human),
    )
}
