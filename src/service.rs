//! Lifecycle service orchestrating todo operations
//!
//! Validates input, enforces the completed-item edit lock, stamps
//! timestamps via the injected clock, and delegates storage to the
//! repository. Failures are returned to the caller with full structured
//! detail; nothing here retries or swallows.

use tracing::debug;

use crate::clock::Clock;
use crate::error::{TodoError, TodoResult};
use crate::ids::IdGenerator;
use crate::models::{CreateTodoInput, Status, Todo, UpdateTodoInput};
use crate::query::{QueryOptions, QueryResult, TodoQuery};
use crate::repository::{TodoChanges, TodoRepository};
use crate::validation::{validate_create, validate_update};

/// Core business logic for todo operations
///
/// The repository, clock, and id generator are injected so time, identity,
/// and storage stay deterministic and substitutable in tests.
pub struct TodoService<R, C, G> {
    repository: R,
    clock: C,
    id_generator: G,
}

impl<R, C, G> TodoService<R, C, G>
where
    R: TodoRepository,
    C: Clock,
    G: IdGenerator,
{
    /// Wire a service from its collaborators
    pub fn new(repository: R, clock: C, id_generator: G) -> Self {
        Self {
            repository,
            clock,
            id_generator,
        }
    }

    /// Create a new todo
    ///
    /// The caller supplies content only; id, timestamps, and the initial
    /// `pending` status are assigned here.
    ///
    /// # Errors
    ///
    /// `TodoError::Validation` on bad input.
    pub async fn create(&self, input: CreateTodoInput) -> TodoResult<Todo> {
        let now = self.clock.now();
        let valid = validate_create(&input, now)?;

        let todo = Todo {
            id: self.id_generator.generate(),
            title: valid.title,
            description: valid.description,
            status: Status::Pending,
            priority: valid.priority,
            due_date: valid.due_date,
            tags: valid.tags,
            created_at: now,
            updated_at: now,
            completed_at: None,
        };
        debug!(todo_id = %todo.id, "creating todo");

        self.repository.create(todo).await
    }

    /// Fetch a todo by id
    ///
    /// # Errors
    ///
    /// `TodoError::NotFound` if the id is absent.
    pub async fn get_by_id(&self, id: &str) -> TodoResult<Todo> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| TodoError::not_found(id))
    }

    /// Find todos matching the query, shaped by the options
    pub async fn find_all(
        &self,
        query: &TodoQuery,
        options: &QueryOptions,
    ) -> TodoResult<QueryResult> {
        self.repository.find_all(query, options).await
    }

    /// Count the todos matching the query
    pub async fn count(&self, query: &TodoQuery) -> TodoResult<usize> {
        self.repository.count(query).await
    }

    /// Partially update a todo
    ///
    /// Only fields present in the input change; `updated_at` is bumped and
    /// `completed_at` is set or cleared to track status transitions.
    ///
    /// # Errors
    ///
    /// `TodoError::NotFound` if the id is absent, `TodoError::BusinessRule`
    /// when editing a completed todo without moving it back to `pending` or
    /// `in_progress`, `TodoError::Validation` on bad input.
    pub async fn update(&self, id: &str, input: UpdateTodoInput) -> TodoResult<Todo> {
        let existing = self.get_by_id(id).await?;

        if violates_edit_lock(&existing, &input) {
            return Err(TodoError::cannot_update_completed(id));
        }

        let valid = validate_update(&input)?;
        let now = self.clock.now();

        let mut changes = TodoChanges {
            title: valid.title,
            description: valid.description,
            priority: valid.priority,
            due_date: valid.due_date,
            tags: valid.tags,
            status: valid.status,
            updated_at: Some(now),
            completed_at: None,
        };
        if let Some(status) = valid.status {
            if status == Status::Completed && existing.status != Status::Completed {
                changes.completed_at = Some(Some(now));
            } else if status != Status::Completed {
                changes.completed_at = Some(None);
            }
        }

        debug!(todo_id = %id, "updating todo");
        self.repository.update(id, changes).await
    }

    /// Delete a todo
    ///
    /// # Errors
    ///
    /// `TodoError::NotFound` if the id is absent.
    pub async fn delete(&self, id: &str) -> TodoResult<()> {
        if !self.repository.exists(id).await? {
            return Err(TodoError::not_found(id));
        }
        debug!(todo_id = %id, "deleting todo");
        self.repository.delete(id).await
    }

    /// Mark a todo as completed
    ///
    /// Idempotent: an already-completed todo is returned unchanged with no
    /// timestamp bump.
    ///
    /// # Errors
    ///
    /// `TodoError::NotFound` if the id is absent.
    pub async fn complete(&self, id: &str) -> TodoResult<Todo> {
        let existing = self.get_by_id(id).await?;
        if existing.status == Status::Completed {
            return Ok(existing);
        }

        let now = self.clock.now();
        debug!(todo_id = %id, "completing todo");
        self.repository
            .update(
                id,
                TodoChanges::new()
                    .with_status(Status::Completed)
                    .with_completed_at(Some(now))
                    .with_updated_at(now),
            )
            .await
    }

    /// Mark a todo as pending again
    ///
    /// Idempotent: an already-pending todo is returned unchanged with no
    /// timestamp bump.
    ///
    /// # Errors
    ///
    /// `TodoError::NotFound` if the id is absent.
    pub async fn uncomplete(&self, id: &str) -> TodoResult<Todo> {
        let existing = self.get_by_id(id).await?;
        if existing.status == Status::Pending {
            return Ok(existing);
        }

        let now = self.clock.now();
        debug!(todo_id = %id, "uncompleting todo");
        self.repository
            .update(
                id,
                TodoChanges::new()
                    .with_status(Status::Pending)
                    .with_completed_at(None)
                    .with_updated_at(now),
            )
            .await
    }
}

/// Completed todos are locked against edits unless the update moves the
/// status back to `pending` or `in_progress`. An update touching no field
/// at all is not an edit and passes.
fn violates_edit_lock(existing: &Todo, input: &UpdateTodoInput) -> bool {
    existing.status == Status::Completed
        && !matches!(
            input.status,
            Some(Status::Pending) | Some(Status::InProgress)
        )
        && input.has_updates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::{DateTime, TimeZone, Utc};

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 15, hour, 0, 0).unwrap()
    }

    fn todo_at(status: Status, hour: u32) -> Todo {
        Todo {
            id: "t1".to_string(),
            title: "Sample".to_string(),
            description: String::new(),
            status,
            priority: Priority::Medium,
            due_date: None,
            tags: Vec::new(),
            created_at: at(hour),
            updated_at: at(hour),
            completed_at: (status == Status::Completed).then(|| at(hour)),
        }
    }

    #[test]
    fn test_edit_lock_rejects_field_change_on_completed() {
        let existing = todo_at(Status::Completed, 9);
        let input = UpdateTodoInput::new().with_title("renamed");
        assert!(violates_edit_lock(&existing, &input));
    }

    #[test]
    fn test_edit_lock_allows_reopening_with_other_fields() {
        let existing = todo_at(Status::Completed, 9);
        let input = UpdateTodoInput::new()
            .with_title("renamed")
            .with_status(Status::Pending);
        assert!(!violates_edit_lock(&existing, &input));

        let to_in_progress = UpdateTodoInput::new().with_status(Status::InProgress);
        assert!(!violates_edit_lock(&existing, &to_in_progress));
    }

    #[test]
    fn test_edit_lock_rejects_recompleting_with_other_fields() {
        let existing = todo_at(Status::Completed, 9);
        let input = UpdateTodoInput::new()
            .with_title("renamed")
            .with_status(Status::Completed);
        assert!(violates_edit_lock(&existing, &input));
    }

    #[test]
    fn test_edit_lock_ignores_empty_update() {
        let existing = todo_at(Status::Completed, 9);
        assert!(!violates_edit_lock(&existing, &UpdateTodoInput::new()));
    }

    #[test]
    fn test_edit_lock_does_not_apply_to_active_todos() {
        let existing = todo_at(Status::InProgress, 9);
        let input = UpdateTodoInput::new().with_title("renamed");
        assert!(!violates_edit_lock(&existing, &input));
    }
}
