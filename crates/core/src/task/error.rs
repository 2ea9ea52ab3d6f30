use thiserror::Error;

/// Errors raised when a task request breaks a business rule.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TaskError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Task title too long (max 100 characters)")]
    TitleTooLong,
    #[error("Task description too long (max 500 characters)")]
    DescriptionTooLong,
    #[error("Due date cannot be in the past")]
    DueDateInPast,
    #[error("Due date must fall between years 1 and 9999")]
    DueDateOutOfRange,
    #[error("Invalid task status: {0}")]
    InvalidStatus(String),
    #[error("Invalid task priority: {0}")]
    InvalidPriority(String),
}
