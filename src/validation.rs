//! Validation rules for creation and update payloads
//!
//! Pure functions: given an input payload and the current instant, produce
//! either a normalized, fully-typed payload or a `TodoError::Validation`
//! enumerating every violated field, never just the first one.

use chrono::{DateTime, NaiveTime, Utc};

use crate::error::{FieldError, TodoError, TodoResult};
use crate::models::{CreateTodoInput, Priority, Status, UpdateTodoInput};

/// Field constraints shared by creation and update validation
pub mod constraints {
    pub const TITLE_MIN_LENGTH: usize = 1;
    pub const TITLE_MAX_LENGTH: usize = 200;
    pub const DESCRIPTION_MAX_LENGTH: usize = 2000;
    pub const MAX_TAGS: usize = 10;
    pub const TAG_MAX_LENGTH: usize = 50;
}

/// A normalized creation payload with all defaults applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidCreate {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Vec<String>,
}

/// A normalized update payload; `None` fields were omitted from the input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date, `None` leaves it unchanged
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub status: Option<Status>,
}

/// Validate a creation payload.
///
/// Applies defaults (empty description, medium priority, no tags) and
/// rejects due dates strictly before the start of the current day. Date-only
/// granularity: a time earlier today is still accepted.
///
/// # Errors
///
/// Returns `TodoError::Validation` listing every violated field.
pub fn validate_create(input: &CreateTodoInput, now: DateTime<Utc>) -> TodoResult<ValidCreate> {
    let mut errors = Vec::new();

    let title = check_title(&input.title, "Title is required", &mut errors);
    let description = match &input.description {
        Some(d) => check_description(d, &mut errors),
        None => Some(String::new()),
    };
    let tags = match &input.tags {
        Some(tags) => check_tags(tags, &mut errors),
        None => Some(Vec::new()),
    };

    if let Some(due) = input.due_date
        && due < start_of_today(now)
    {
        errors.push(FieldError::new(
            "due_date",
            "Due date cannot be in the past",
            "invalid_date",
        ));
    }

    if !errors.is_empty() {
        return Err(TodoError::validation(errors));
    }

    Ok(ValidCreate {
        // errors is empty here, so every check returned Some
        title: title.unwrap_or_default(),
        description: description.unwrap_or_default(),
        priority: input.priority.unwrap_or_default(),
        due_date: input.due_date,
        tags: tags.unwrap_or_default(),
    })
}

/// Validate an update payload.
///
/// Same per-field shape constraints as creation, except every field is
/// optional and the due date may be any instant (past dates are allowed so
/// mistakes can be corrected) or an explicit clear.
///
/// # Errors
///
/// Returns `TodoError::Validation` listing every violated field.
pub fn validate_update(input: &UpdateTodoInput) -> TodoResult<ValidUpdate> {
    let mut errors = Vec::new();

    let title = input
        .title
        .as_ref()
        .and_then(|t| check_title(t, "Title cannot be empty", &mut errors));
    let description = input
        .description
        .as_ref()
        .and_then(|d| check_description(d, &mut errors));
    let tags = input
        .tags
        .as_ref()
        .and_then(|tags| check_tags(tags, &mut errors));

    if !errors.is_empty() {
        return Err(TodoError::validation(errors));
    }

    Ok(ValidUpdate {
        title,
        description,
        priority: input.priority,
        due_date: input.due_date,
        tags,
        status: input.status,
    })
}

/// Validate and normalize a title; returns the trimmed form
fn check_title(title: &str, empty_message: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    let trimmed = title.trim();
    let len = trimmed.chars().count();
    if len < constraints::TITLE_MIN_LENGTH {
        errors.push(FieldError::new("title", empty_message, "too_small"));
        return None;
    }
    if len > constraints::TITLE_MAX_LENGTH {
        errors.push(FieldError::new(
            "title",
            format!(
                "Title must be at most {} characters",
                constraints::TITLE_MAX_LENGTH
            ),
            "too_big",
        ));
        return None;
    }
    Some(trimmed.to_string())
}

/// Validate a description
fn check_description(description: &str, errors: &mut Vec<FieldError>) -> Option<String> {
    if description.chars().count() > constraints::DESCRIPTION_MAX_LENGTH {
        errors.push(FieldError::new(
            "description",
            format!(
                "Description must be at most {} characters",
                constraints::DESCRIPTION_MAX_LENGTH
            ),
            "too_big",
        ));
        return None;
    }
    Some(description.to_string())
}

/// Validate a tag list: count bound plus per-entry length and charset checks
fn check_tags(tags: &[String], errors: &mut Vec<FieldError>) -> Option<Vec<String>> {
    let mut ok = true;

    if tags.len() > constraints::MAX_TAGS {
        errors.push(FieldError::new(
            "tags",
            format!("Maximum {} tags allowed", constraints::MAX_TAGS),
            "too_big",
        ));
        ok = false;
    }

    for (i, tag) in tags.iter().enumerate() {
        if tag.is_empty() {
            errors.push(FieldError::new(
                format!("tags.{}", i),
                "Tag cannot be empty",
                "too_small",
            ));
            ok = false;
            continue;
        }
        if tag.chars().count() > constraints::TAG_MAX_LENGTH {
            errors.push(FieldError::new(
                format!("tags.{}", i),
                format!(
                    "Tag must be at most {} characters",
                    constraints::TAG_MAX_LENGTH
                ),
                "too_big",
            ));
            ok = false;
            continue;
        }
        if !tag.chars().all(is_tag_char) {
            errors.push(FieldError::new(
                format!("tags.{}", i),
                "Tag can only contain letters, numbers, underscores, and hyphens",
                "invalid_format",
            ));
            ok = false;
        }
    }

    ok.then(|| tags.to_vec())
}

/// Characters permitted in a tag: `[a-zA-Z0-9_-]`
fn is_tag_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Midnight at the start of the current UTC day
fn start_of_today(now: DateTime<Utc>) -> DateTime<Utc> {
    now.date_naive().and_time(NaiveTime::MIN).and_utc()
}
