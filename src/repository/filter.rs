//! In-memory filter, sort, and pagination engine
//!
//! Pure functions of (candidate set, query, options, "now"); no hidden
//! state. Relative date buckets are computed against the supplied "now" at
//! evaluation time, never against item timestamps.

use std::cmp::Ordering;

use chrono::{DateTime, Duration, NaiveTime, Utc};

use crate::models::Todo;
use crate::query::{QueryOptions, QueryResult, RelativeDue, Sort, SortDirection, SortField, TodoQuery};

/// Whether a todo passes every criterion of the query; criteria combine
/// with AND
pub fn matches_query(todo: &Todo, query: &TodoQuery, now: DateTime<Utc>) -> bool {
    if let Some(status) = &query.status
        && !status.matches(todo.status)
    {
        return false;
    }

    if let Some(priority) = &query.priority
        && !priority.matches(todo.priority)
    {
        return false;
    }

    if !query.tags.is_empty() {
        let matched = if query.tags_match_all {
            query.tags.iter().all(|t| todo.tags.contains(t))
        } else {
            query.tags.iter().any(|t| todo.tags.contains(t))
        };
        if !matched {
            return false;
        }
    }

    if let Some(search) = &query.search {
        let needle = search.to_lowercase();
        let in_title = todo.title.to_lowercase().contains(&needle);
        let in_description = todo.description.to_lowercase().contains(&needle);
        if !in_title && !in_description {
            return false;
        }
    }

    if let Some(required) = query.has_due_date
        && todo.due_date.is_some() != required
    {
        return false;
    }

    if let Some(bound) = query.due_before {
        match todo.due_date {
            Some(due) if due <= bound => {}
            _ => return false,
        }
    }

    if let Some(bound) = query.due_after {
        match todo.due_date {
            Some(due) if due >= bound => {}
            _ => return false,
        }
    }

    if let Some(bucket) = query.due_relative {
        let Some(due) = todo.due_date else {
            return false;
        };
        if !in_relative_bucket(due, bucket, now) {
            return false;
        }
    }

    true
}

/// Whether a due date falls within the named bucket relative to "now"
fn in_relative_bucket(due: DateTime<Utc>, bucket: RelativeDue, now: DateTime<Utc>) -> bool {
    let start_today = start_of_day(now);
    let end_today = end_of_day(now);
    match bucket {
        RelativeDue::Today => due >= start_today && due <= end_today,
        RelativeDue::Tomorrow => {
            let end_tomorrow = end_of_day(now + Duration::days(1));
            due > end_today && due <= end_tomorrow
        }
        RelativeDue::Week => {
            let end_week = end_of_day(now + Duration::days(7));
            due >= start_today && due <= end_week
        }
        RelativeDue::Overdue => due < start_today,
    }
}

/// Midnight at the start of the given instant's UTC day
fn start_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    at.date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// The last representable instant of the given instant's UTC day
fn end_of_day(at: DateTime<Utc>) -> DateTime<Utc> {
    start_of_day(at) + Duration::days(1) - Duration::nanoseconds(1)
}

/// Sort todos in place, stably, per the sort instruction
///
/// Stability means equal keys keep their prior relative order, so ties fall
/// back to insertion order for the in-memory store.
pub fn sort_todos(todos: &mut [Todo], sort: Sort) {
    todos.sort_by(|a, b| compare(a, b, sort));
}

fn compare(a: &Todo, b: &Todo, sort: Sort) -> Ordering {
    let ordering = match sort.field {
        SortField::Created => a.created_at.cmp(&b.created_at),
        SortField::Updated => a.updated_at.cmp(&b.updated_at),
        // Undated items sort last in display order whatever the direction,
        // so the direction multiplier must not touch the absent arms.
        SortField::Due => return compare_due(a, b, sort.direction),
        SortField::Priority => a.priority.sort_order().cmp(&b.priority.sort_order()),
        SortField::Title => compare_titles(&a.title, &b.title),
        SortField::Status => a.status.sort_order().cmp(&b.status.sort_order()),
    };
    apply_direction(ordering, sort.direction)
}

fn compare_due(a: &Todo, b: &Todo, direction: SortDirection) -> Ordering {
    match (a.due_date, b.due_date) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(x), Some(y)) => apply_direction(x.cmp(&y), direction),
    }
}

/// Case-insensitive title comparison; the raw titles break exact
/// case-folded ties so the order stays total
fn compare_titles(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

fn apply_direction(ordering: Ordering, direction: SortDirection) -> Ordering {
    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Run the full pipeline: filter, count, sort, then slice by offset/limit
pub fn run_query(
    todos: Vec<Todo>,
    query: &TodoQuery,
    options: &QueryOptions,
    now: DateTime<Utc>,
) -> QueryResult {
    let mut matching: Vec<Todo> = todos
        .into_iter()
        .filter(|todo| matches_query(todo, query, now))
        .collect();

    let total = matching.len();
    sort_todos(&mut matching, options.sort.unwrap_or_default());

    let offset = options.offset.unwrap_or(0);
    let page: Vec<Todo> = matching
        .into_iter()
        .skip(offset)
        .take(options.limit.unwrap_or(usize::MAX))
        .collect();

    let has_more = offset + page.len() < total;
    QueryResult {
        todos: page,
        total,
        has_more,
    }
}
