mod support;

use support::{json_data, TestWorkspace};

fn seed(ws: &TestWorkspace) {
    json_data(ws, &["project", "new", "Launch"]);
    json_data(ws, &["project", "new", "Website"]);
    json_data(
        ws,
        &["task", "new", "Launch", "Launch prep", "--priority", "high"],
    );
    json_data(
        ws,
        &[
            "task",
            "new",
            "Website",
            "Write blog",
            "--priority",
            "medium",
            "--due",
            "2025-11-01",
            "--tags",
            "content",
            "--description",
            "post about the launch",
        ],
    );
}

fn titles(data: &serde_json::Value) -> Vec<String> {
    data["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|task| task["title"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn missing_due_date_fails_the_before_predicate() {
    let ws = TestWorkspace::new();
    seed(&ws);

    // "Launch prep" matches the priority and the text, but has no due date,
    // so the strict conjunction yields nothing.
    let results = json_data(
        &ws,
        &["search", "priority:high", "due:before:2025-12-01", "launch"],
    );
    assert_eq!(results["total"], 0);
}

#[test]
fn free_text_matches_title_and_description() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let results = json_data(&ws, &["search", "launch"]);
    assert_eq!(
        titles(&results),
        vec!["Launch prep", "Write blog"],
        "matches title of one task and description of the other"
    );
}

#[test]
fn due_bound_filters_tasks_with_dates() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let results = json_data(&ws, &["search", "due:before:2025-12-01"]);
    assert_eq!(titles(&results), vec!["Write blog"]);
}

#[test]
fn project_token_scopes_by_name() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let results = json_data(&ws, &["search", "launch", "project:Website"]);
    assert_eq!(titles(&results), vec!["Write blog"]);
}

#[test]
fn unknown_keys_are_ignored() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let plain = json_data(&ws, &["search", "launch"]);
    let with_noise = json_data(&ws, &["search", "owner:alice", "launch"]);
    assert_eq!(titles(&plain), titles(&with_noise));
}

#[test]
fn tag_list_restricts_results() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let results = json_data(&ws, &["search", "launch", "--tags", "content,design"]);
    assert_eq!(titles(&results), vec!["Write blog"]);
}

#[test]
fn sort_options_apply_to_results() {
    let ws = TestWorkspace::new();
    seed(&ws);

    let results = json_data(
        &ws,
        &["search", "launch", "--sort-by", "priority", "--order", "desc"],
    );
    assert_eq!(titles(&results), vec!["Launch prep", "Write blog"]);
}

#[test]
fn archived_tasks_are_not_searched() {
    let ws = TestWorkspace::new();
    seed(&ws);
    json_data(&ws, &["project", "archive", "Launch"]);

    let results = json_data(&ws, &["search", "launch"]);
    assert_eq!(titles(&results), vec!["Write blog"]);
}
