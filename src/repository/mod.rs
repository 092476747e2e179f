//! Persistence abstraction the lifecycle service depends on
//!
//! The trait is the contract; `InMemoryTodoRepository` is the reference
//! implementation. A relational backend may push filtering, sorting, and
//! pagination down to the storage engine, but must produce identical results
//! for identical inputs and "now".

mod filter;
mod memory;

pub use filter::{matches_query, run_query, sort_todos};
pub use memory::InMemoryTodoRepository;

use chrono::{DateTime, Utc};

use crate::error::TodoResult;
use crate::models::{Priority, Status, Todo};
use crate::query::{QueryOptions, QueryResult, TodoQuery};

/// Partial field changes applied by [`TodoRepository::update`]
///
/// Deliberately carries no `id` or `created_at` field, so callers cannot
/// overwrite either. `None` means "leave unchanged"; the doubly-optional
/// fields use `Some(None)` for an explicit clear.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoChanges {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub due_date: Option<Option<DateTime<Utc>>>,
    pub tags: Option<Vec<String>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<Option<DateTime<Utc>>>,
}

impl TodoChanges {
    /// Create an empty change set
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a new title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set a new description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set a new status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Set a new priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set or clear the due date
    pub fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replace the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }

    /// Set the last-updated timestamp
    pub fn with_updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Set or clear the completion timestamp
    pub fn with_completed_at(mut self, completed_at: Option<DateTime<Utc>>) -> Self {
        self.completed_at = Some(completed_at);
        self
    }

    /// Check if any field is set
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.status.is_some()
            || self.priority.is_some()
            || self.due_date.is_some()
            || self.tags.is_some()
            || self.updated_at.is_some()
            || self.completed_at.is_some()
    }

    /// Apply the changes to a stored record, leaving absent fields untouched
    pub fn apply_to(&self, todo: &mut Todo) {
        if let Some(title) = &self.title {
            todo.title = title.clone();
        }
        if let Some(description) = &self.description {
            todo.description = description.clone();
        }
        if let Some(status) = self.status {
            todo.status = status;
        }
        if let Some(priority) = self.priority {
            todo.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            todo.due_date = due_date;
        }
        if let Some(tags) = &self.tags {
            todo.tags = tags.clone();
        }
        if let Some(updated_at) = self.updated_at {
            todo.updated_at = updated_at;
        }
        if let Some(completed_at) = self.completed_at {
            todo.completed_at = completed_at;
        }
    }
}

/// Storage contract for todos
///
/// Every implementation is implicitly scoped to one user key, chosen by
/// whoever constructs the repository instance; ids from other users' scopes
/// simply do not exist here.
#[allow(async_fn_in_trait)]
pub trait TodoRepository {
    /// Persist a fully-formed todo and return the stored value
    async fn create(&self, todo: Todo) -> TodoResult<Todo>;

    /// Fetch a todo by id, `None` if absent
    async fn find_by_id(&self, id: &str) -> TodoResult<Option<Todo>>;

    /// Return the todos matching the query, shaped by the options
    async fn find_all(&self, query: &TodoQuery, options: &QueryOptions)
    -> TodoResult<QueryResult>;

    /// Apply partial changes to a stored todo
    ///
    /// Fails with `TodoError::NotFound` if the id is absent.
    async fn update(&self, id: &str, changes: TodoChanges) -> TodoResult<Todo>;

    /// Remove a todo; fails with `TodoError::NotFound` if the id is absent
    async fn delete(&self, id: &str) -> TodoResult<()>;

    /// Whether a todo with the given id exists
    async fn exists(&self, id: &str) -> TodoResult<bool>;

    /// Count the todos matching the query, ignoring pagination
    async fn count(&self, query: &TodoQuery) -> TodoResult<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_todo() -> Todo {
        let at = Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap();
        Todo {
            id: "t1".to_string(),
            title: "Original".to_string(),
            description: "desc".to_string(),
            status: Status::Pending,
            priority: Priority::Medium,
            due_date: None,
            tags: vec!["a".to_string()],
            created_at: at,
            updated_at: at,
            completed_at: None,
        }
    }

    #[test]
    fn test_changes_default_has_no_updates() {
        assert!(!TodoChanges::new().has_updates());
    }

    #[test]
    fn test_changes_apply_partial() {
        let mut todo = sample_todo();
        TodoChanges::new()
            .with_title("Renamed")
            .with_priority(Priority::High)
            .apply_to(&mut todo);

        assert_eq!(todo.title, "Renamed");
        assert_eq!(todo.priority, Priority::High);
        // untouched fields survive
        assert_eq!(todo.description, "desc");
        assert_eq!(todo.status, Status::Pending);
        assert_eq!(todo.tags, vec!["a"]);
    }

    #[test]
    fn test_changes_clear_due_date() {
        let mut todo = sample_todo();
        todo.due_date = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());

        TodoChanges::new().with_due_date(None).apply_to(&mut todo);
        assert!(todo.due_date.is_none());
    }

    #[test]
    fn test_changes_set_and_clear_completed_at() {
        let mut todo = sample_todo();
        let done = Utc.with_ymd_and_hms(2025, 1, 7, 9, 0, 0).unwrap();

        TodoChanges::new()
            .with_status(Status::Completed)
            .with_completed_at(Some(done))
            .apply_to(&mut todo);
        assert_eq!(todo.status, Status::Completed);
        assert_eq!(todo.completed_at, Some(done));

        TodoChanges::new()
            .with_status(Status::Pending)
            .with_completed_at(None)
            .apply_to(&mut todo);
        assert_eq!(todo.status, Status::Pending);
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn test_changes_cannot_touch_id_or_created_at() {
        let mut todo = sample_todo();
        let before = todo.clone();
        // The struct has no id/created_at fields; a full change set still
        // leaves both untouched.
        TodoChanges::new()
            .with_title("x")
            .with_description("y")
            .with_status(Status::InProgress)
            .with_priority(Priority::Low)
            .with_due_date(None)
            .with_tags(["z"])
            .with_updated_at(Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap())
            .with_completed_at(None)
            .apply_to(&mut todo);

        assert_eq!(todo.id, before.id);
        assert_eq!(todo.created_at, before.created_at);
    }
}
