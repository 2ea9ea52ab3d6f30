//! Cached task repository decorator.
//!
//! Wraps a `TaskRepository` implementation with the cache-aside pattern.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use tasktrack_core::cache::{
    deserialize_task, serialize_task, task_key, Cache, CacheError, Result as CacheResult,
};
use tasktrack_core::storage::{Pagination, Result, TaskFilter, TaskRepository};
use tasktrack_core::task::{NewTask, Task};

/// Upper bound for a single cache round trip unless overridden.
pub const DEFAULT_CACHE_OP_TIMEOUT: Duration = Duration::from_millis(250);

/// Cached task repository decorator.
///
/// - **Reads**: check the cache first, on miss fetch from the repository and
///   populate the cache.
/// - **Writes**: persist to the repository, then evict the task key.
/// - **Queries** (`list_tasks`, `get_overdue_tasks`): go straight to the
///   repository.
///
/// Cache failures never fail a request. Every cache call is bounded by
/// `cache_timeout` and a timeout is handled like any other cache error.
///
/// # Type Parameters
///
/// * `R` - The underlying repository implementation
/// * `C` - The cache implementation
pub struct CachedTaskRepository<R, C>
where
    R: TaskRepository,
    C: Cache,
{
    repository: Arc<R>,
    cache: Arc<C>,
    ttl: Duration,
    cache_timeout: Duration,
}

impl<R, C> CachedTaskRepository<R, C>
where
    R: TaskRepository,
    C: Cache,
{
    /// Creates a new cached task repository.
    ///
    /// # Arguments
    ///
    /// * `repository` - The underlying repository to cache
    /// * `cache` - The cache implementation
    /// * `ttl` - Time-to-live for cached tasks
    pub fn new(repository: Arc<R>, cache: Arc<C>, ttl: Duration) -> Self {
        Self {
            repository,
            cache,
            ttl,
            cache_timeout: DEFAULT_CACHE_OP_TIMEOUT,
        }
    }

    /// Overrides the per-call cache timeout.
    pub fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }

    async fn cache_call<T, F>(&self, op: F) -> CacheResult<T>
    where
        F: Future<Output = CacheResult<T>>,
    {
        bounded(self.cache_timeout, op).await
    }

    async fn cached_task(&self, id: Uuid, key: &str) -> Option<Task> {
        match self.cache_call(self.cache.get(key)).await {
            Ok(Some(bytes)) => match deserialize_task(&bytes) {
                Ok(task) if task.id == id => {
                    tracing::trace!(task_id = %id, "Cache hit for task");
                    Some(task)
                }
                Ok(task) => {
                    tracing::warn!(task_id = %id, cached_id = %task.id, "Cached task has mismatched id");
                    None
                }
                Err(err) => {
                    tracing::warn!(task_id = %id, error = %err, "Cache entry deserialization failed");
                    None
                }
            },
            Ok(None) => {
                tracing::trace!(task_id = %id, "Cache miss for task");
                None
            }
            Err(err) => {
                tracing::warn!(task_id = %id, error = %err, "Cache read failed, falling back to store");
                None
            }
        }
    }

    async fn fill(&self, key: &str, task: &Task) {
        let bytes = match serialize_task(task) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(task_id = %task.id, error = %err, "Failed to serialize task for cache");
                return;
            }
        };

        if let Err(err) = self
            .cache_call(self.cache.set(key, &bytes, Some(self.ttl)))
            .await
        {
            tracing::warn!(task_id = %task.id, error = %err, "Failed to cache task");
        }
    }

    async fn invalidate(&self, id: Uuid) {
        evict(self.cache.as_ref(), self.cache_timeout, id).await;
    }

    fn eviction_guard(&self, id: Uuid) -> EvictOnDrop<C>
    where
        C: 'static,
    {
        EvictOnDrop {
            cache: self.cache.clone(),
            timeout: self.cache_timeout,
            id,
            armed: true,
        }
    }
}

async fn bounded<T, F>(timeout: Duration, op: F) -> CacheResult<T>
where
    F: Future<Output = CacheResult<T>>,
{
    match tokio::time::timeout(timeout, op).await {
        Ok(result) => result,
        Err(_) => Err(CacheError::Timeout(timeout)),
    }
}

async fn evict<C: Cache>(cache: &C, timeout: Duration, id: Uuid) {
    let key = task_key(id);
    if let Err(err) = bounded(timeout, cache.delete(&key)).await {
        tracing::warn!(
            task_id = %id,
            error = %err,
            "Failed to invalidate task cache; entry may be stale until TTL expiry"
        );
    }
}

/// Evicts a task key from a background task if dropped while armed.
///
/// Held across a store write and its invalidation. If the caller's future is
/// dropped in between, the store call is abandoned but the key is still
/// evicted.
struct EvictOnDrop<C: Cache + 'static> {
    cache: Arc<C>,
    timeout: Duration,
    id: Uuid,
    armed: bool,
}

impl<C: Cache + 'static> EvictOnDrop<C> {
    fn disarm(mut self) {
        self.armed = false;
    }
}

impl<C: Cache + 'static> Drop for EvictOnDrop<C> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            tracing::warn!(task_id = %self.id, "Task write cancelled outside a runtime; cache entry may be stale until TTL expiry");
            return;
        };

        tracing::warn!(task_id = %self.id, "Task write cancelled, invalidating cache in background");
        let cache = self.cache.clone();
        let timeout = self.timeout;
        let id = self.id;
        runtime.spawn(async move {
            evict(cache.as_ref(), timeout, id).await;
        });
    }
}

#[async_trait]
impl<R, C> TaskRepository for CachedTaskRepository<R, C>
where
    R: TaskRepository + 'static,
    C: Cache + 'static,
{
    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let task = self.repository.create_task(new_task).await?;
        tracing::debug!(task_id = %task.id, "Task created");
        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Task> {
        let key = task_key(id);

        if let Some(task) = self.cached_task(id, &key).await {
            return Ok(task);
        }

        let task = self.repository.get_task(id).await?;
        self.fill(&key, &task).await;
        Ok(task)
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let guard = self.eviction_guard(task.id);
        let updated = match self.repository.update_task(task).await {
            Ok(updated) => updated,
            Err(err) => {
                guard.disarm();
                return Err(err);
            }
        };
        self.invalidate(task.id).await;
        guard.disarm();

        tracing::debug!(task_id = %task.id, "Task updated");
        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        let guard = self.eviction_guard(id);
        if let Err(err) = self.repository.delete_task(id).await {
            guard.disarm();
            return Err(err);
        }
        self.invalidate(id).await;
        guard.disarm();

        tracing::debug!(task_id = %id, "Task deleted");
        Ok(())
    }

    async fn list_tasks(&self, filter: &TaskFilter, pagination: Pagination) -> Result<Vec<Task>> {
        self.repository.list_tasks(filter, pagination).await
    }

    async fn get_overdue_tasks(&self, threshold: DateTime<Utc>) -> Result<Vec<Task>> {
        self.repository.get_overdue_tasks(threshold).await
    }
}
