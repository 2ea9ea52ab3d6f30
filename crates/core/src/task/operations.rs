use chrono::{DateTime, Datelike, Duration, Utc};

use crate::storage::{Pagination, TaskFilter};

use super::error::TaskError;
use super::requests::{CreateTaskRequest, UpdateTaskRequest};
use super::types::Task;

pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_DESCRIPTION_LEN: usize = 500;

/// How far in the past a due date may be at creation time.
pub const CREATE_DUE_DATE_TOLERANCE: Duration = Duration::minutes(1);

/// Tasks whose due date is older than this are overdue.
pub const OVERDUE_AFTER: Duration = Duration::hours(24);

pub const DEFAULT_LIST_LIMIT: u32 = 50;
pub const DEFAULT_UPCOMING_LIMIT: u32 = 10;
pub const MAX_PAGE_LIMIT: u32 = 100;

const MIN_DUE_YEAR: i32 = 1;
const MAX_DUE_YEAR: i32 = 9999;

fn validate_title(title: &str) -> Result<(), TaskError> {
    if title.trim().is_empty() {
        return Err(TaskError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskError::TitleTooLong);
    }
    Ok(())
}

fn validate_description(description: Option<&str>) -> Result<(), TaskError> {
    match description {
        Some(d) if d.chars().count() > MAX_DESCRIPTION_LEN => Err(TaskError::DescriptionTooLong),
        _ => Ok(()),
    }
}

/// Timestamps are stored as RFC 3339 text, which only has four year digits.
fn validate_due_date_range(due_date: DateTime<Utc>) -> Result<(), TaskError> {
    if (MIN_DUE_YEAR..=MAX_DUE_YEAR).contains(&due_date.year()) {
        Ok(())
    } else {
        Err(TaskError::DueDateOutOfRange)
    }
}

/// Validates a create request against the clock reading `now`.
pub fn validate_create(request: &CreateTaskRequest, now: DateTime<Utc>) -> Result<(), TaskError> {
    validate_title(&request.title)?;
    validate_description(request.description.as_deref())?;
    validate_due_date_range(request.due_date)?;
    if request.due_date < now - CREATE_DUE_DATE_TOLERANCE {
        return Err(TaskError::DueDateInPast);
    }
    Ok(())
}

/// Validates the fields present in a partial update. Unlike creation, a due
/// date strictly before `now` is rejected with no tolerance.
pub fn validate_update(request: &UpdateTaskRequest, now: DateTime<Utc>) -> Result<(), TaskError> {
    if let Some(title) = &request.title {
        validate_title(title)?;
    }
    validate_description(request.description.as_deref())?;
    if let Some(due_date) = request.due_date {
        validate_due_date_range(due_date)?;
        if due_date < now {
            return Err(TaskError::DueDateInPast);
        }
    }
    Ok(())
}

/// Blank descriptions are stored as absent.
pub fn normalize_description(description: String) -> Option<String> {
    if description.trim().is_empty() {
        None
    } else {
        Some(description)
    }
}

/// Clamps a requested page size: anything outside `1..=MAX_PAGE_LIMIT`
/// falls back to `default`.
pub fn clamp_limit(requested: Option<i64>, default: u32) -> u32 {
    match requested {
        Some(limit) if (1..=i64::from(MAX_PAGE_LIMIT)).contains(&limit) => limit as u32,
        _ => default,
    }
}

/// Builds list pagination from raw query values.
pub fn list_pagination(limit: Option<i64>, offset: Option<i64>) -> Pagination {
    Pagination {
        limit: clamp_limit(limit, DEFAULT_LIST_LIMIT),
        offset: offset
            .map(|o| o.clamp(0, i64::from(u32::MAX)) as u32)
            .unwrap_or(0),
    }
}

/// Filter used for the upcoming view: pending tasks only.
pub fn upcoming_filter() -> TaskFilter {
    TaskFilter::new().with_status(super::TaskStatus::Pending)
}

/// Threshold for the overdue view relative to `now`.
pub fn overdue_threshold(now: DateTime<Utc>) -> DateTime<Utc> {
    now - OVERDUE_AFTER
}

/// A task is overdue when due strictly before `threshold` and not done.
pub fn is_overdue(task: &Task, threshold: DateTime<Utc>) -> bool {
    task.due_date < threshold && task.status != super::TaskStatus::Done
}

/// Orders tasks by due date ascending, ties broken by creation time.
pub fn sort_by_due_date(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        a.due_date
            .cmp(&b.due_date)
            .then_with(|| a.created_at.cmp(&b.created_at))
    });
}

/// Filters, orders and paginates tasks. Pagination is applied after filtering.
pub fn query_tasks<'a, I>(tasks: I, filter: &TaskFilter, pagination: Pagination) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut matching: Vec<Task> = tasks
        .into_iter()
        .filter(|task| filter.matches(task))
        .cloned()
        .collect();
    sort_by_due_date(&mut matching);
    matching
        .into_iter()
        .skip(pagination.offset as usize)
        .take(pagination.limit as usize)
        .collect()
}

/// Selects overdue tasks ordered by due date ascending.
pub fn overdue_tasks<'a, I>(tasks: I, threshold: DateTime<Utc>) -> Vec<Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut overdue: Vec<Task> = tasks
        .into_iter()
        .filter(|task| is_overdue(task, threshold))
        .cloned()
        .collect();
    sort_by_due_date(&mut overdue);
    overdue
}
