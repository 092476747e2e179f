//! Error types for the todo domain core
//!
//! The taxonomy mirrors what transports need to map onto wire responses:
//! validation failures (400), missing records (404), business-rule
//! violations (422), and storage failures propagated unchanged (500).

use serde::Serialize;
use thiserror::Error;

/// A single violated field within a validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Path of the offending field (e.g. `title`, `tags.3`)
    pub field: String,
    /// Human-readable message
    pub message: String,
    /// Machine-readable code (`too_small`, `too_big`, `invalid_format`, `invalid_date`)
    pub code: &'static str,
}

impl FieldError {
    /// Create a new field error
    pub fn new(field: impl Into<String>, message: impl Into<String>, code: &'static str) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
        }
    }
}

/// Identifiers for the business rules the lifecycle service enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BusinessRule {
    /// Cannot update a completed todo (uncomplete it first)
    CannotUpdateCompleted,
    /// Due date cannot be in the past at creation time
    DueDateInPast,
}

impl BusinessRule {
    /// Returns the stable rule identifier used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            BusinessRule::CannotUpdateCompleted => "BR-02",
            BusinessRule::DueDateInPast => "BR-03",
        }
    }
}

impl std::fmt::Display for BusinessRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for all todo core operations
#[derive(Error, Debug)]
pub enum TodoError {
    /// Input failed validation; carries one entry per violated field
    #[error("validation failed: {} field error(s)", errors.len())]
    Validation { errors: Vec<FieldError> },

    /// The referenced todo does not exist in the caller's scope
    #[error("Todo '{todo_id}' not found")]
    NotFound { todo_id: String },

    /// A business rule was violated despite well-formed input
    #[error("{message}")]
    BusinessRule {
        rule: BusinessRule,
        message: String,
    },

    /// Failure from a storage backend, propagated unchanged
    #[error("storage backend failure")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl TodoError {
    /// Build a validation error from collected field errors
    pub fn validation(errors: Vec<FieldError>) -> Self {
        TodoError::Validation { errors }
    }

    /// Build a not-found error for the given id
    pub fn not_found(todo_id: impl Into<String>) -> Self {
        TodoError::NotFound {
            todo_id: todo_id.into(),
        }
    }

    /// Rule BR-02: cannot update a completed todo
    pub fn cannot_update_completed(todo_id: &str) -> Self {
        TodoError::BusinessRule {
            rule: BusinessRule::CannotUpdateCompleted,
            message: format!(
                "Cannot update completed todo: {}. Uncomplete it first.",
                todo_id
            ),
        }
    }

    /// Get the full error message including per-field validation details.
    ///
    /// Useful when a transport wants a single human-readable string.
    pub fn full_message(&self) -> String {
        match self {
            TodoError::Validation { errors } => errors
                .iter()
                .map(|e| format!("{}: {}", e.field, e.message))
                .collect::<Vec<_>>()
                .join("; "),
            other => other.to_string(),
        }
    }

    /// Suggested HTTP status code for this error kind
    pub fn status_code(&self) -> u16 {
        match self {
            TodoError::Validation { .. } => 400,
            TodoError::NotFound { .. } => 404,
            TodoError::BusinessRule { .. } => 422,
            TodoError::Storage(_) => 500,
        }
    }
}

/// Result type alias for todo core operations
pub type TodoResult<T> = Result<T, TodoError>;
