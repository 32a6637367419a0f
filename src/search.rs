//! Search query mini-language.
//!
//! A query is split on whitespace. `key:value` tokens become structured
//! predicates for the recognized keys (`priority`, `status`, `project`,
//! `due:before:<date>`, `due:after:<date>`); tokens with an unrecognized key,
//! or a recognized key whose value does not parse, are silently dropped.
//! The remaining bare words are joined into one case-insensitive substring
//! predicate over title and description. Evaluation is a conjunction: a task
//! must satisfy every extracted predicate.

use chrono::{DateTime, Utc};

use crate::normalize;
use crate::task::{Task, TaskPriority, TaskStatus};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub project: Option<String>,
    pub due_before: Option<DateTime<Utc>>,
    pub due_after: Option<DateTime<Utc>>,
    pub text: Option<String>,
}

impl SearchQuery {
    /// Best-effort parse; never fails.
    pub fn parse(input: &str) -> Self {
        let mut query = SearchQuery::default();
        let mut words: Vec<&str> = Vec::new();

        for token in input.split_whitespace() {
            match token.split_once(':') {
                Some(("status", value)) => {
                    if let Ok(status) = TaskStatus::parse(value) {
                        query.status = Some(status);
                    }
                }
                Some(("priority", value)) => {
                    if let Ok(priority) = TaskPriority::parse(value) {
                        query.priority = Some(priority);
                    }
                }
                Some(("project", value)) => {
                    if !value.is_empty() {
                        query.project = Some(value.to_string());
                    }
                }
                Some(("due", value)) => match value.split_once(':') {
                    Some(("before", date)) => {
                        if let Ok(instant) = normalize::parse_due_date(date) {
                            query.due_before = Some(instant);
                        }
                    }
                    Some(("after", date)) => {
                        if let Ok(instant) = normalize::parse_due_date(date) {
                            query.due_after = Some(instant);
                        }
                    }
                    _ => {}
                },
                Some(_) => {}
                None => words.push(token),
            }
        }

        if !words.is_empty() {
            query.text = Some(words.join(" ").to_lowercase());
        }
        query
    }

    /// True when the task satisfies every predicate except `project`, which
    /// the caller resolves against the project collection.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(status) = self.status {
            if task.status != status {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != Some(priority) {
                return false;
            }
        }
        // A task without a due date fails both due predicates.
        if let Some(before) = self.due_before {
            if !task.due_date.map(|due| due < before).unwrap_or(false) {
                return false;
            }
        }
        if let Some(after) = self.due_after {
            if !task.due_date.map(|due| due > after).unwrap_or(false) {
                return false;
            }
        }
        if let Some(text) = self.text.as_deref() {
            let in_title = task.title.to_lowercase().contains(text);
            let in_description = task
                .description
                .as_deref()
                .map(|description| description.to_lowercase().contains(text))
                .unwrap_or(false);
            if !in_title && !in_description {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn task(title: &str) -> Task {
        let now = Utc::now();
        Task {
            id: "task-0000test".to_string(),
            project_id: "prj-0000test".to_string(),
            title: title.to_string(),
            description: None,
            status: TaskStatus::Todo,
            priority: None,
            due_date: None,
            tags: Vec::new(),
            parent_task_id: None,
            archived: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parses_structured_tokens_and_free_text() {
        let query = SearchQuery::parse("priority:high status:todo Launch prep");
        assert_eq!(query.priority, Some(TaskPriority::High));
        assert_eq!(query.status, Some(TaskStatus::Todo));
        assert_eq!(query.text.as_deref(), Some("launch prep"));
    }

    #[test]
    fn parses_due_bounds() {
        let query = SearchQuery::parse("due:before:2025-12-01 due:after:2025-01-01");
        assert_eq!(
            query.due_before.map(|d| d.to_rfc3339()),
            Some("2025-12-01T00:00:00+00:00".to_string())
        );
        assert_eq!(
            query.due_after.map(|d| d.to_rfc3339()),
            Some("2025-01-01T00:00:00+00:00".to_string())
        );
    }

    #[test]
    fn unknown_keys_and_bad_values_are_dropped() {
        let query = SearchQuery::parse("owner:alice priority:urgent due:soon banner");
        assert_eq!(query.priority, None);
        assert_eq!(query.due_before, None);
        assert_eq!(query.text.as_deref(), Some("banner"));
    }

    #[test]
    fn empty_query_matches_everything() {
        let query = SearchQuery::parse("   ");
        assert_eq!(query, SearchQuery::default());
        assert!(query.matches(&task("anything at all")));
    }

    #[test]
    fn text_matches_title_or_description_case_insensitively() {
        let query = SearchQuery::parse("LAUNCH");
        assert!(query.matches(&task("Launch prep")));

        let mut described = task("Banner");
        described.description = Some("for the launch".to_string());
        assert!(query.matches(&described));

        assert!(!query.matches(&task("Unrelated")));
    }

    #[test]
    fn conjunction_is_strict() {
        // Priority matches and the text matches, but the task has no due
        // date, so the before-bound fails the whole query.
        let query = SearchQuery::parse("priority:high due:before:2025-12-01 launch");
        let mut candidate = task("Launch prep");
        candidate.priority = Some(TaskPriority::High);
        assert!(!query.matches(&candidate));

        candidate.due_date = Some(normalize::parse_due_date("2025-11-15").unwrap());
        assert!(query.matches(&candidate));
    }

    #[test]
    fn due_predicates_are_exclusive_bounds() {
        let query = SearchQuery::parse("due:before:2025-12-01");
        let mut candidate = task("Launch prep");
        candidate.due_date = Some(normalize::parse_due_date("2025-12-01").unwrap());
        assert!(!query.matches(&candidate));
    }
}
