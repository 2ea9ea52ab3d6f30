use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::TaskError;

/// Truncates a timestamp to microsecond precision.
///
/// Every timestamp that reaches a store goes through this, so a task read
/// back from SQLite, from memory, or from a cache payload compares equal to
/// the value the store returned on write.
pub fn normalize_timestamp(ts: DateTime<Utc>) -> DateTime<Utc> {
    ts.trunc_subsecs(6)
}

/// Workflow state of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Done,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::InProgress => "in_progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TaskStatus::Pending),
            "in_progress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(TaskError::InvalidStatus(other.to_string())),
        }
    }
}

/// Relative importance of a task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = TaskError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(TaskError::InvalidPriority(other.to_string())),
        }
    }
}

/// A persisted task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Materializes a new task with a fresh id and both timestamps set to `now`.
    pub fn create(new_task: NewTask, now: DateTime<Utc>) -> Self {
        let now = normalize_timestamp(now);
        Self {
            id: Uuid::new_v4(),
            title: new_task.title,
            description: new_task.description,
            status: new_task.status,
            priority: new_task.priority,
            due_date: normalize_timestamp(new_task.due_date),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes `updated_at`, never letting it fall behind `created_at`.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = normalize_timestamp(now).max(self.created_at);
        self.due_date = normalize_timestamp(self.due_date);
    }
}

/// Everything a store needs to create a task; id and timestamps are
/// assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub due_date: DateTime<Utc>,
}

impl NewTask {
    pub fn new(title: impl Into<String>, due_date: DateTime<Utc>) -> Self {
        Self {
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = priority;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap() + Duration::nanoseconds(123_456_789)
    }

    #[test]
    fn test_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskStatus::InProgress).unwrap(),
            r#""in_progress""#
        );
        assert_eq!(
            serde_json::from_str::<TaskStatus>(r#""done""#).unwrap(),
            TaskStatus::Done
        );
        assert!(serde_json::from_str::<TaskStatus>(r#""archived""#).is_err());
    }

    #[test]
    fn test_priority_wire_format() {
        assert_eq!(
            serde_json::to_string(&TaskPriority::High).unwrap(),
            r#""high""#
        );
        assert_eq!("low".parse::<TaskPriority>().unwrap(), TaskPriority::Low);
        assert_eq!(
            "urgent".parse::<TaskPriority>(),
            Err(TaskError::InvalidPriority("urgent".to_string()))
        );
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done] {
            assert_eq!(status.as_str().parse::<TaskStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_defaults() {
        assert_eq!(TaskStatus::default(), TaskStatus::Pending);
        assert_eq!(TaskPriority::default(), TaskPriority::Medium);
    }

    #[test]
    fn test_create_sets_equal_timestamps() {
        let now = fixed_now();
        let task = Task::create(NewTask::new("Ship report", now), now);

        assert_eq!(task.created_at, task.updated_at);
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.created_at.timestamp_subsec_nanos(), 123_456_000);
        assert_eq!(task.due_date.timestamp_subsec_nanos(), 123_456_000);
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let now = fixed_now();
        let a = Task::create(NewTask::new("a", now), now);
        let b = Task::create(NewTask::new("b", now), now);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_touch_never_precedes_created_at() {
        let now = fixed_now();
        let mut task = Task::create(NewTask::new("Ship report", now), now);

        task.touch(now - Duration::hours(1));
        assert_eq!(task.updated_at, task.created_at);

        task.touch(now + Duration::hours(1));
        assert!(task.updated_at > task.created_at);
    }
}
