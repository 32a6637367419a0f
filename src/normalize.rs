//! Input validation and normalization.
//!
//! Free-form caller input (names, titles, descriptions, comma-separated tag
//! lists, due dates) is sanitized here before it reaches the services.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

use crate::error::{Error, Result};

/// Trim and collapse internal whitespace; fail if nothing remains.
///
/// `field` names the input in the error message ("project name",
/// "task title").
pub fn clean_required(field: &str, value: &str) -> Result<String> {
    let cleaned = collapse_whitespace(value);
    if cleaned.is_empty() {
        return Err(Error::Validation(format!("{field} cannot be empty")));
    }
    Ok(cleaned)
}

/// Trim and collapse an optional free-text field; empty becomes None.
pub fn clean_optional(value: Option<String>) -> Option<String> {
    let value = value?;
    let cleaned = collapse_whitespace(&value);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Lowercase, trim, and deduplicate a tag list, preserving first-seen order.
/// Empty entries are dropped.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim().to_lowercase();
        if tag.is_empty() || seen.contains(&tag) {
            continue;
        }
        seen.push(tag);
    }
    seen
}

/// Split a comma-separated tag string and normalize the result.
pub fn parse_tag_list(input: &str) -> Vec<String> {
    normalize_tags(input.split(','))
}

/// Parse a due date: RFC 3339, or a plain `YYYY-MM-DD` taken as midnight UTC.
pub fn parse_due_date(value: &str) -> Result<DateTime<Utc>> {
    let trimmed = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(instant.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        let midnight = date.and_time(NaiveTime::MIN);
        return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
    }
    Err(Error::Validation(format!(
        "invalid date '{trimmed}' (expected RFC 3339 or YYYY-MM-DD)"
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_required_collapses_whitespace() {
        let cleaned = clean_required("task title", "  Write   the\tcopy  ").unwrap();
        assert_eq!(cleaned, "Write the copy");
    }

    #[test]
    fn clean_required_rejects_blank() {
        let err = clean_required("project name", "   ").unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(err.to_string().contains("project name"));
    }

    #[test]
    fn clean_optional_drops_blank() {
        assert_eq!(clean_optional(None), None);
        assert_eq!(clean_optional(Some("  ".to_string())), None);
        assert_eq!(
            clean_optional(Some(" two  words ".to_string())),
            Some("two words".to_string())
        );
    }

    #[test]
    fn tags_are_lowercased_and_deduplicated() {
        let tags = parse_tag_list("Marketing, urgent ,MARKETING,, launch");
        assert_eq!(tags, vec!["marketing", "urgent", "launch"]);
    }

    #[test]
    fn due_date_accepts_plain_date() {
        let parsed = parse_due_date("2025-12-01").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-12-01T00:00:00+00:00");
    }

    #[test]
    fn due_date_accepts_rfc3339() {
        let parsed = parse_due_date("2025-12-01T08:30:00Z").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2025-12-01T08:30:00+00:00");
    }

    #[test]
    fn due_date_rejects_garbage() {
        assert!(matches!(
            parse_due_date("next tuesday"),
            Err(Error::Validation(_))
        ));
    }
}
