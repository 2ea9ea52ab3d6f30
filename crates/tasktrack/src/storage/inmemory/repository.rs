//! In-memory task store.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use tasktrack_core::storage::{Pagination, RepositoryError, Result, TaskFilter, TaskRepository};
use tasktrack_core::task::{overdue_tasks, query_tasks, NewTask, Task};

use crate::lifecycle::Shutdown;

/// In-memory storage backend for testing.
///
/// Uses a HashMap wrapped in `Arc<RwLock<_>>` for thread-safe access.
/// Data is not persisted and will be lost when the store is dropped.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
}

impl InMemoryTaskStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskStore {
    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let task = Task::create(new_task, Utc::now());
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(RepositoryError::AlreadyExists {
                entity_type: "Task",
                id: task.id.to_string(),
            });
        }
        tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Task> {
        let tasks = self.tasks.read().await;
        tasks
            .get(&id)
            .cloned()
            .ok_or_else(|| RepositoryError::task_not_found(id))
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let mut tasks = self.tasks.write().await;
        let stored = tasks
            .get_mut(&task.id)
            .ok_or_else(|| RepositoryError::task_not_found(task.id))?;

        let created_at = stored.created_at;
        *stored = task.clone();
        stored.created_at = created_at;
        stored.touch(Utc::now());
        Ok(stored.clone())
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.remove(&id).is_none() {
            return Err(RepositoryError::task_not_found(id));
        }
        Ok(())
    }

    async fn list_tasks(&self, filter: &TaskFilter, pagination: Pagination) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(query_tasks(tasks.values(), filter, pagination))
    }

    async fn get_overdue_tasks(&self, threshold: DateTime<Utc>) -> Result<Vec<Task>> {
        let tasks = self.tasks.read().await;
        Ok(overdue_tasks(tasks.values(), threshold))
    }
}

#[async_trait]
impl Shutdown for InMemoryTaskStore {
    fn name(&self) -> &'static str {
        "inmemory"
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.tasks.write().await.clear();
        Ok(())
    }
}
