//! API request types for task operations.
//!
//! These are pure data types with no I/O. Every optional field is an explicit
//! `Option`: `None` means "absent", never "set to null".

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::serde::{deserialize_optional_from_str, deserialize_optional_string};
use crate::storage::TaskFilter;

use super::operations::normalize_description;
use super::types::{normalize_timestamp, NewTask, Task, TaskPriority, TaskStatus};

/// Request payload for creating a new task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    pub due_date: DateTime<Utc>,
}

impl CreateTaskRequest {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            priority: None,
            due_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Convert into a `NewTask`. New tasks always start as pending.
    pub fn into_new_task(self) -> NewTask {
        NewTask {
            title: self.title,
            description: self.description.and_then(normalize_description),
            status: TaskStatus::Pending,
            priority: self.priority.unwrap_or_default(),
            due_date: self.due_date,
        }
    }
}

/// Partial update for a task. Only fields that are `Some` are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// A blank description clears the stored one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<TaskPriority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
}

impl UpdateTaskRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Apply the present fields to an existing task.
    pub fn apply_to(self, task: &mut Task) {
        if let Some(title) = self.title {
            task.title = title;
        }
        if let Some(description) = self.description {
            task.description = normalize_description(description);
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = normalize_timestamp(due_date);
        }
    }
}

/// Query parameters for `GET /api/tasks`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListTasksQuery {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub priority: Option<TaskPriority>,
    #[serde(default, deserialize_with = "deserialize_optional_string")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub limit: Option<i64>,
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub offset: Option<i64>,
}

impl ListTasksQuery {
    pub fn filter(&self) -> TaskFilter {
        TaskFilter {
            status: self.status,
            priority: self.priority,
            search: self.search.clone(),
        }
    }
}

/// Query parameters for `GET /api/tasks/upcoming`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpcomingTasksQuery {
    #[serde(default, deserialize_with = "deserialize_optional_from_str")]
    pub limit: Option<i64>,
}
