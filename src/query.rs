//! Query specification: filter criteria, sort and pagination options, and a
//! fluent builder for assembling them incrementally
//!
//! A query has two independent parts: the filter (`TodoQuery`) and the
//! result-shaping options (`QueryOptions`). Filter fields combine with
//! logical AND across fields; set-valued fields are OR within the set.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Priority, Status, Todo};

/// Status filter criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusFilter {
    /// Exactly this status
    One(Status),
    /// Any of the listed statuses
    AnyOf(Vec<Status>),
    /// Shorthand for "not completed"
    Active,
    /// No status filter
    All,
}

impl StatusFilter {
    /// Whether a todo with the given status passes this filter
    pub fn matches(&self, status: Status) -> bool {
        match self {
            StatusFilter::One(s) => *s == status,
            StatusFilter::AnyOf(set) => set.contains(&status),
            StatusFilter::Active => status != Status::Completed,
            StatusFilter::All => true,
        }
    }
}

/// Priority filter criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriorityFilter {
    /// Exactly this priority
    One(Priority),
    /// Any of the listed priorities
    AnyOf(Vec<Priority>),
}

impl PriorityFilter {
    /// Whether a todo with the given priority passes this filter
    pub fn matches(&self, priority: Priority) -> bool {
        match self {
            PriorityFilter::One(p) => *p == priority,
            PriorityFilter::AnyOf(set) => set.contains(&priority),
        }
    }
}

/// Named due-date window computed against wall-clock "now" at evaluation
/// time. A todo without a due date never matches any bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelativeDue {
    /// Within [start of today, end of today]
    Today,
    /// Within (end of today, end of tomorrow]
    Tomorrow,
    /// Within [start of today, end of today + 7 days]
    Week,
    /// Strictly before the start of today
    Overdue,
}

impl RelativeDue {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            RelativeDue::Today => "today",
            RelativeDue::Tomorrow => "tomorrow",
            RelativeDue::Week => "week",
            RelativeDue::Overdue => "overdue",
        }
    }
}

impl std::fmt::Display for RelativeDue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Field to sort results by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Created,
    Updated,
    Due,
    Priority,
    Title,
    Status,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// A sort instruction: field plus direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Sort ascending by the given field
    pub fn asc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Asc,
        }
    }

    /// Sort descending by the given field
    pub fn desc(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Desc,
        }
    }
}

impl Default for Sort {
    /// Newest first
    fn default() -> Self {
        Sort::desc(SortField::Created)
    }
}

/// Filter criteria for querying todos
///
/// All fields are optional; the default query matches everything. Fields
/// combine with AND across the struct.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoQuery {
    /// Status criterion
    pub status: Option<StatusFilter>,

    /// Priority criterion
    pub priority: Option<PriorityFilter>,

    /// Tags to match; empty means no tag filter
    pub tags: Vec<String>,

    /// When true the todo must carry every listed tag, otherwise at least one
    pub tags_match_all: bool,

    /// Case-insensitive substring matched against title or description
    pub search: Option<String>,

    /// `Some(true)` requires a due date, `Some(false)` requires none
    pub has_due_date: Option<bool>,

    /// Inclusive upper bound on the due date; undated todos never match
    pub due_before: Option<DateTime<Utc>>,

    /// Inclusive lower bound on the due date; undated todos never match
    pub due_after: Option<DateTime<Utc>>,

    /// Relative due-date bucket, layered on top of the absolute bounds
    pub due_relative: Option<RelativeDue>,
}

impl TodoQuery {
    /// A query matching everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this query filters anything at all
    pub fn is_empty(&self) -> bool {
        self.status.is_none()
            && self.priority.is_none()
            && self.tags.is_empty()
            && self.search.is_none()
            && self.has_due_date.is_none()
            && self.due_before.is_none()
            && self.due_after.is_none()
            && self.due_relative.is_none()
    }
}

/// Result-shaping options: sort plus pagination
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Sort instruction; `None` means the default `created desc`
    pub sort: Option<Sort>,

    /// Maximum number of items to return
    pub limit: Option<usize>,

    /// Number of matching items to skip before the first returned one
    pub offset: Option<usize>,
}

/// A page of query results
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryResult {
    /// The matching todos for this page, in sort order
    pub todos: Vec<Todo>,

    /// Count of all matches before pagination
    pub total: usize,

    /// Whether more matches exist beyond this page
    pub has_more: bool,
}

/// Fluent builder accumulating filter and option fields
///
/// Chainable; `build` emits an immutable `(TodoQuery, QueryOptions)` pair
/// without consuming the builder, and `reset` clears accumulated state for
/// reuse. The builder performs no validation of its own.
///
/// # Example
///
/// ```
/// use todo_core::{SortField, Status, StatusFilter, TodoQueryBuilder};
///
/// let (query, options) = TodoQueryBuilder::new()
///     .with_status(StatusFilter::One(Status::Pending))
///     .with_tags(["work"])
///     .sort_desc(SortField::Due)
///     .with_limit(20)
///     .build();
/// assert_eq!(query.tags, vec!["work"]);
/// assert_eq!(options.limit, Some(20));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TodoQueryBuilder {
    query: TodoQuery,
    options: QueryOptions,
}

impl TodoQueryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by status
    pub fn with_status(mut self, status: StatusFilter) -> Self {
        self.query.status = Some(status);
        self
    }

    /// Filter to active (not completed) todos
    pub fn only_active(mut self) -> Self {
        self.query.status = Some(StatusFilter::Active);
        self
    }

    /// Filter by priority
    pub fn with_priority(mut self, priority: PriorityFilter) -> Self {
        self.query.priority = Some(priority);
        self
    }

    /// Filter by tags, matching any of them
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query.tags = tags.into_iter().map(|t| t.into()).collect();
        self.query.tags_match_all = false;
        self
    }

    /// Filter by tags, requiring all of them
    pub fn with_all_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query.tags = tags.into_iter().map(|t| t.into()).collect();
        self.query.tags_match_all = true;
        self
    }

    /// Filter by case-insensitive substring of title or description
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.query.search = Some(search.into());
        self
    }

    /// Require the presence (or absence) of a due date
    pub fn with_has_due_date(mut self, has_due_date: bool) -> Self {
        self.query.has_due_date = Some(has_due_date);
        self
    }

    /// Require the due date to be at or before the given instant
    pub fn due_before(mut self, bound: DateTime<Utc>) -> Self {
        self.query.due_before = Some(bound);
        self
    }

    /// Require the due date to be at or after the given instant
    pub fn due_after(mut self, bound: DateTime<Utc>) -> Self {
        self.query.due_after = Some(bound);
        self
    }

    /// Filter by a relative due-date bucket
    pub fn due_relative(mut self, bucket: RelativeDue) -> Self {
        self.query.due_relative = Some(bucket);
        self
    }

    /// Set the sort instruction
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.options.sort = Some(sort);
        self
    }

    /// Sort ascending by the given field
    pub fn sort_asc(self, field: SortField) -> Self {
        self.with_sort(Sort::asc(field))
    }

    /// Sort descending by the given field
    pub fn sort_desc(self, field: SortField) -> Self {
        self.with_sort(Sort::desc(field))
    }

    /// Limit the number of returned items
    pub fn with_limit(mut self, limit: usize) -> Self {
        self.options.limit = Some(limit);
        self
    }

    /// Skip the given number of matching items
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.options.offset = Some(offset);
        self
    }

    /// Emit the accumulated query and options, leaving the builder intact
    pub fn build(&self) -> (TodoQuery, QueryOptions) {
        (self.query.clone(), self.options)
    }

    /// Clear all accumulated state for reuse
    pub fn reset(mut self) -> Self {
        self.query = TodoQuery::default();
        self.options = QueryOptions::default();
        self
    }
}
