use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::task::{NewTask, Task};

use super::{Pagination, Result, TaskFilter};

/// Repository for task operations.
///
/// Implemented by the durable stores and by the cache-aside decorator, so
/// callers never know whether a cache sits in front of the store.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Persists a new task, assigning its id and timestamps.
    async fn create_task(&self, new_task: NewTask) -> Result<Task>;

    /// Gets a task by its ID. A missing row is `RepositoryError::NotFound`.
    async fn get_task(&self, id: Uuid) -> Result<Task>;

    /// Overwrites the mutable fields of an existing task and refreshes
    /// `updated_at`. Never creates.
    async fn update_task(&self, task: &Task) -> Result<Task>;

    /// Deletes a task by its ID.
    async fn delete_task(&self, id: Uuid) -> Result<()>;

    /// Lists tasks matching `filter`, ordered by due date ascending.
    async fn list_tasks(&self, filter: &TaskFilter, pagination: Pagination) -> Result<Vec<Task>>;

    /// Lists tasks due strictly before `threshold` that are not done,
    /// ordered by due date ascending.
    async fn get_overdue_tasks(&self, threshold: DateTime<Utc>) -> Result<Vec<Task>>;
}
