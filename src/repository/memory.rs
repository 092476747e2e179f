//! In-memory reference implementation of the repository contract
//!
//! Backed by a mutex-guarded, insertion-ordered list so concurrent
//! mutations to one user's data serialize through a single queue and tied
//! sort keys resolve to insertion order on every instance. The clock is
//! injected because relative due-date buckets are evaluated against "now"
//! at query time.

use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::error::{TodoError, TodoResult};
use crate::models::Todo;
use crate::query::{QueryOptions, QueryResult, TodoQuery};
use crate::repository::filter::{matches_query, run_query};
use crate::repository::{TodoChanges, TodoRepository};

/// Mutex-guarded, insertion-ordered list of todos for one user scope
pub struct InMemoryTodoRepository {
    store: Mutex<Vec<Todo>>,
    clock: Arc<dyn Clock + Send + Sync>,
}

impl InMemoryTodoRepository {
    /// Create an empty repository using the system clock
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create an empty repository with an injected clock
    pub fn with_clock(clock: Arc<dyn Clock + Send + Sync>) -> Self {
        Self {
            store: Mutex::new(Vec::new()),
            clock,
        }
    }

    /// Remove every stored todo
    pub fn clear(&self) {
        self.lock().clear();
        debug!("cleared in-memory todo store");
    }

    /// Number of stored todos, ignoring any filter
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the store holds no todos
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Todo>> {
        // A poisoned lock only means another thread panicked mid-operation;
        // the list itself is still usable.
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for InMemoryTodoRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl TodoRepository for InMemoryTodoRepository {
    async fn create(&self, todo: Todo) -> TodoResult<Todo> {
        debug!(todo_id = %todo.id, "storing todo");
        let mut store = self.lock();
        // replacing an existing id keeps its original position
        match store.iter_mut().find(|t| t.id == todo.id) {
            Some(slot) => *slot = todo.clone(),
            None => store.push(todo.clone()),
        }
        Ok(todo)
    }

    async fn find_by_id(&self, id: &str) -> TodoResult<Option<Todo>> {
        trace!(todo_id = %id, "looking up todo");
        Ok(self.lock().iter().find(|t| t.id == id).cloned())
    }

    async fn find_all(
        &self,
        query: &TodoQuery,
        options: &QueryOptions,
    ) -> TodoResult<QueryResult> {
        let todos: Vec<Todo> = self.lock().clone();
        let result = run_query(todos, query, options, self.clock.now());
        trace!(
            total = result.total,
            returned = result.todos.len(),
            "ran todo query"
        );
        Ok(result)
    }

    async fn update(&self, id: &str, changes: TodoChanges) -> TodoResult<Todo> {
        debug!(todo_id = %id, "applying todo changes");
        let mut store = self.lock();
        let todo = store
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| TodoError::not_found(id))?;
        changes.apply_to(todo);
        Ok(todo.clone())
    }

    async fn delete(&self, id: &str) -> TodoResult<()> {
        debug!(todo_id = %id, "deleting todo");
        let mut store = self.lock();
        match store.iter().position(|t| t.id == id) {
            Some(index) => {
                store.remove(index);
                Ok(())
            }
            None => Err(TodoError::not_found(id)),
        }
    }

    async fn exists(&self, id: &str) -> TodoResult<bool> {
        Ok(self.lock().iter().any(|t| t.id == id))
    }

    async fn count(&self, query: &TodoQuery) -> TodoResult<usize> {
        let now = self.clock.now();
        let store = self.lock();
        let count = store
            .iter()
            .filter(|todo| matches_query(todo, query, now))
            .count();
        Ok(count)
    }
}
