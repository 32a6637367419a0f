//! taskdeck search command implementation.

use std::path::PathBuf;

use crate::cli::open_services;
use crate::cli::task::task_line;
use crate::error::Result;
use crate::normalize;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::task::{SortKey, SortOrder, Task};

pub struct SearchOptions {
    pub query: String,
    pub tags: Option<String>,
    pub sort_by: Option<String>,
    pub order: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct SearchOutput {
    query: String,
    total: usize,
    tasks: Vec<Task>,
}

pub fn run_search(options: SearchOptions) -> Result<()> {
    let services = open_services(options.data_dir)?;
    let tags = options
        .tags
        .as_deref()
        .map(normalize::parse_tag_list)
        .unwrap_or_default();
    let sort_by = options
        .sort_by
        .as_deref()
        .map(SortKey::parse)
        .transpose()?
        .unwrap_or_default();
    let order = options
        .order
        .as_deref()
        .map(SortOrder::parse)
        .transpose()?
        .unwrap_or_default();

    let tasks = services.tasks.search(&options.query, &tags, sort_by, order)?;
    let output = SearchOutput {
        query: options.query,
        total: tasks.len(),
        tasks,
    };

    let mut human = HumanOutput::new("Search results");
    human.push_summary("Query", output.query.clone());
    human.push_summary("Total", output.total.to_string());
    for task in &output.tasks {
        human.push_detail(task_line(task));
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "search",
        &output,
        Some(&human),
    )
}
