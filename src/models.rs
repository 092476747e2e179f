//! Data models for the todo domain core
//!
//! Defines the `Todo` entity, its value enums, and the input payloads
//! accepted by the lifecycle service for creation and partial updates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Todo lifecycle status
///
/// Governs edit permissions: once a todo is `Completed`, general updates
/// are rejected until it transitions back to `Pending` or `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Pending,
    InProgress,
    Completed,
}

impl Status {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "pending",
            Status::InProgress => "in_progress",
            Status::Completed => "completed",
        }
    }

    /// Ordinal used when sorting by status (`pending < in_progress < completed`)
    pub fn sort_order(&self) -> u8 {
        match self {
            Status::Pending => 1,
            Status::InProgress => 2,
            Status::Completed => 3,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Todo priority level
///
/// Ordered `low < medium < high < urgent` for sort purposes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Returns the string representation used on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
            Priority::Urgent => "urgent",
        }
    }

    /// Ordinal used when sorting by priority (higher number = more urgent)
    pub fn sort_order(&self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
            Priority::Urgent => 4,
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single todo item owned by one user
///
/// Invariants maintained by the lifecycle service:
/// - `id` and `created_at` never change after creation
/// - `completed_at` is `Some` exactly when `status == Completed`
/// - `updated_at >= created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Todo {
    /// Unique identifier, assigned at creation
    pub id: String,

    /// Title (1-200 characters)
    pub title: String,

    /// Description (0-2000 characters, defaults to empty)
    #[serde(default)]
    pub description: String,

    /// Current lifecycle status
    pub status: Status,

    /// Priority level
    pub priority: Priority,

    /// Optional due date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    /// Tags for categorization (0-10 entries)
    #[serde(default)]
    pub tags: Vec<String>,

    /// Creation timestamp, never mutated
    pub created_at: DateTime<Utc>,

    /// Last update timestamp, bumped on every successful mutation
    pub updated_at: DateTime<Utc>,

    /// Set when status transitions to `Completed`, cleared on any
    /// transition away from it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Input payload for creating a new todo
///
/// Only `title` is required; the validation layer applies defaults for the
/// rest and rejects due dates before the start of the current day.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateTodoInput {
    /// Title (required, 1-200 characters)
    pub title: String,

    /// Description (0-2000 characters, defaults to empty)
    #[serde(default)]
    pub description: Option<String>,

    /// Priority (defaults to medium)
    #[serde(default)]
    pub priority: Option<Priority>,

    /// Due date; must not be before the start of today
    #[serde(default)]
    pub due_date: Option<DateTime<Utc>>,

    /// Tags (defaults to empty)
    #[serde(default)]
    pub tags: Option<Vec<String>>,
}

impl CreateTodoInput {
    /// Create an input with the given title and no optional fields
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Set the priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Set the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }
}

/// Input payload for partially updating a todo
///
/// Every field is optional; `None` means "leave unchanged". The due date is
/// doubly optional so that "omitted" and "explicitly cleared" stay distinct:
/// `None` = unchanged, `Some(None)` = clear, `Some(Some(d))` = set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTodoInput {
    /// New title (1-200 characters)
    #[serde(default)]
    pub title: Option<String>,

    /// New description (0-2000 characters)
    #[serde(default)]
    pub description: Option<String>,

    /// New priority
    #[serde(default)]
    pub priority: Option<Priority>,

    /// New due date; past dates are allowed on update, `Some(None)` clears
    #[serde(default, deserialize_with = "double_option")]
    pub due_date: Option<Option<DateTime<Utc>>>,

    /// New tags (replaces the whole list)
    #[serde(default)]
    pub tags: Option<Vec<String>>,

    /// New status
    #[serde(default)]
    pub status: Option<Status>,
}

/// Deserialize a field where "absent" and "null" must stay distinguishable:
/// a missing field leaves the outer Option as `None` (via serde default),
/// while an explicit `null` becomes `Some(None)`.
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

impl UpdateTodoInput {
    /// Create an empty update (no fields set)
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

    /// Set a new priority
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set a new due date
    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(Some(due_date));
        self
    }

    /// Clear the due date
    pub fn clear_due_date(mut self) -> Self {
        self.due_date = Some(None);
        self
    }

    /// Replace the tags
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags = Some(tags.into_iter().map(|t| t.into()).collect());
        self
    }

    /// Set a new status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = Some(status);
        self
    }

    /// Check if any field is set
    pub fn has_updates(&self) -> bool {
        self.title.is_some()
            || self.description.is_some()
            || self.priority.is_some()
            || self.due_date.is_some()
            || self.tags.is_some()
            || self.status.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_todo() -> Todo {
        Todo {
            id: "todo1".to_string(),
            title: "Buy groceries".to_string(),
            description: String::new(),
            status: Status::Pending,
            priority: Priority::Medium,
            due_date: None,
            tags: Vec::new(),
            created_at: Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2025, 1, 6, 12, 0, 0).unwrap(),
            completed_at: None,
        }
    }

    // Status enum tests

    #[test]
    fn test_status_as_str() {
        assert_eq!(Status::Pending.as_str(), "pending");
        assert_eq!(Status::InProgress.as_str(), "in_progress");
        assert_eq!(Status::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_display() {
        assert_eq!(format!("{}", Status::Pending), "pending");
        assert_eq!(format!("{}", Status::InProgress), "in_progress");
        assert_eq!(format!("{}", Status::Completed), "completed");
    }

    #[test]
    fn test_status_serialize() {
        assert_eq!(
            serde_json::to_string(&Status::Pending).unwrap(),
            "\"pending\""
        );
        assert_eq!(
            serde_json::to_string(&Status::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&Status::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn test_status_deserialize() {
        assert_eq!(
            serde_json::from_str::<Status>("\"pending\"").unwrap(),
            Status::Pending
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"in_progress\"").unwrap(),
            Status::InProgress
        );
        assert_eq!(
            serde_json::from_str::<Status>("\"completed\"").unwrap(),
            Status::Completed
        );
    }

    #[test]
    fn test_status_deserialize_rejects_unknown() {
        assert!(serde_json::from_str::<Status>("\"done\"").is_err());
    }

    #[test]
    fn test_status_sort_order() {
        assert!(Status::Pending.sort_order() < Status::InProgress.sort_order());
        assert!(Status::InProgress.sort_order() < Status::Completed.sort_order());
    }

    // Priority enum tests

    #[test]
    fn test_priority_as_str() {
        assert_eq!(Priority::Low.as_str(), "low");
        assert_eq!(Priority::Medium.as_str(), "medium");
        assert_eq!(Priority::High.as_str(), "high");
        assert_eq!(Priority::Urgent.as_str(), "urgent");
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_sort_order() {
        assert!(Priority::Low.sort_order() < Priority::Medium.sort_order());
        assert!(Priority::Medium.sort_order() < Priority::High.sort_order());
        assert!(Priority::High.sort_order() < Priority::Urgent.sort_order());
    }

    #[test]
    fn test_priority_serialize_roundtrip() {
        for p in [
            Priority::Low,
            Priority::Medium,
            Priority::High,
            Priority::Urgent,
        ] {
            let json = serde_json::to_string(&p).unwrap();
            assert_eq!(serde_json::from_str::<Priority>(&json).unwrap(), p);
        }
    }

    // Todo entity tests

    #[test]
    fn test_todo_serialize_omits_absent_optionals() {
        let todo = sample_todo();
        let value = serde_json::to_value(&todo).unwrap();
        assert_eq!(value["title"], "Buy groceries");
        assert_eq!(value["status"], "pending");
        assert_eq!(value["priority"], "medium");
        assert!(value.get("due_date").is_none());
        assert!(value.get("completed_at").is_none());
    }

    #[test]
    fn test_todo_serialize_with_due_date() {
        let mut todo = sample_todo();
        todo.due_date = Some(Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap());
        let value = serde_json::to_value(&todo).unwrap();
        let due = value["due_date"].as_str().unwrap();
        assert!(due.contains('T'), "due_date should be ISO8601: {}", due);
    }

    #[test]
    fn test_todo_deserialize_defaults() {
        let json = r#"{
            "id": "t1",
            "title": "Minimal",
            "status": "pending",
            "priority": "low",
            "created_at": "2025-01-06T12:00:00Z",
            "updated_at": "2025-01-06T12:00:00Z"
        }"#;
        let todo: Todo = serde_json::from_str(json).unwrap();
        assert_eq!(todo.description, "");
        assert!(todo.tags.is_empty());
        assert!(todo.due_date.is_none());
        assert!(todo.completed_at.is_none());
    }

    #[test]
    fn test_todo_clone_and_eq() {
        let todo = sample_todo();
        let cloned = todo.clone();
        assert_eq!(todo, cloned);
    }

    // CreateTodoInput tests

    #[test]
    fn test_create_input_new() {
        let input = CreateTodoInput::new("Task");
        assert_eq!(input.title, "Task");
        assert!(input.description.is_none());
        assert!(input.priority.is_none());
        assert!(input.due_date.is_none());
        assert!(input.tags.is_none());
    }

    #[test]
    fn test_create_input_builder_chain() {
        let due = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
        let input = CreateTodoInput::new("Task")
            .with_description("details")
            .with_priority(Priority::High)
            .with_due_date(due)
            .with_tags(["work", "urgent"]);

        assert_eq!(input.description, Some("details".to_string()));
        assert_eq!(input.priority, Some(Priority::High));
        assert_eq!(input.due_date, Some(due));
        assert_eq!(input.tags, Some(vec!["work".to_string(), "urgent".to_string()]));
    }

    // UpdateTodoInput tests

    #[test]
    fn test_update_input_default_has_no_updates() {
        let input = UpdateTodoInput::new();
        assert!(!input.has_updates());
    }

    #[test]
    fn test_update_input_builder_chain() {
        let input = UpdateTodoInput::new()
            .with_title("New")
            .with_priority(Priority::Urgent)
            .with_status(Status::InProgress);
        assert_eq!(input.title, Some("New".to_string()));
        assert_eq!(input.priority, Some(Priority::Urgent));
        assert_eq!(input.status, Some(Status::InProgress));
        assert!(input.has_updates());
    }

    #[test]
    fn test_update_input_due_date_tri_state() {
        let unchanged = UpdateTodoInput::new();
        assert_eq!(unchanged.due_date, None);

        let cleared = UpdateTodoInput::new().clear_due_date();
        assert_eq!(cleared.due_date, Some(None));
        assert!(cleared.has_updates());

        let due = Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap();
        let set = UpdateTodoInput::new().with_due_date(due);
        assert_eq!(set.due_date, Some(Some(due)));
    }

    #[test]
    fn test_update_input_deserialize_distinguishes_null_from_missing() {
        let omitted: UpdateTodoInput = serde_json::from_str(r#"{"title":"x"}"#).unwrap();
        assert_eq!(omitted.due_date, None);

        let cleared: UpdateTodoInput =
            serde_json::from_str(r#"{"due_date":null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateTodoInput =
            serde_json::from_str(r#"{"due_date":"2025-03-01T09:00:00Z"}"#).unwrap();
        let inner = set.due_date.unwrap().unwrap();
        assert_eq!(inner, Utc.with_ymd_and_hms(2025, 3, 1, 9, 0, 0).unwrap());
    }
}
