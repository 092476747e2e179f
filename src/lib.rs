//! Domain core for a multi-user todo application
//!
//! Provides the todo entity and its value types, creation/update validation,
//! a filter/sort/pagination query engine, and the lifecycle service that
//! enforces the completed-item edit lock and timestamp bookkeeping. Storage,
//! time, and identity are behind traits so transports and tests can supply
//! their own.

pub mod clock;
pub mod error;
pub mod ids;
pub mod models;
pub mod query;
pub mod repository;
pub mod service;
pub mod validation;

pub use clock::{Clock, SystemClock};
pub use error::{BusinessRule, FieldError, TodoError, TodoResult};
pub use ids::{IdGenerator, RandomIdGenerator};
pub use models::{CreateTodoInput, Priority, Status, Todo, UpdateTodoInput};
pub use query::{
    PriorityFilter, QueryOptions, QueryResult, RelativeDue, Sort, SortDirection, SortField,
    StatusFilter, TodoQuery, TodoQueryBuilder,
};
pub use repository::{InMemoryTodoRepository, TodoChanges, TodoRepository};
pub use service::TodoService;

// Ensure the shared pieces stay usable across async task boundaries
static_assertions::assert_impl_all!(InMemoryTodoRepository: Send, Sync);
static_assertions::assert_impl_all!(
    TodoService<InMemoryTodoRepository, SystemClock, RandomIdGenerator>: Send, Sync
);
static_assertions::assert_impl_all!(Todo: Send, Sync, Clone);
static_assertions::assert_impl_all!(TodoError: Send, Sync);
