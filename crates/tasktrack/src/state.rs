//! Application state with repository-based storage.
//!
//! This module defines the shared application state that is passed to all
//! request handlers. The task repository is a trait object so handlers do not
//! care which store and cache back it. Backend combinations are wired by
//! feature-gated factory modules below.

use std::{sync::Arc, time::Duration};

use axum::extract::FromRef;

use tasktrack_core::storage::TaskRepository;

use crate::{auth::JwtAuth, config::Config, lifecycle::Shutdown, service::TaskService};

/// Shared application state.
///
/// Cloned for each request handler. Every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub auth: JwtAuth,
    pub request_timeout: Duration,
    /// Store and cache clients, closed in order by `shutdown`.
    resources: Arc<Vec<Arc<dyn Shutdown>>>,
}

impl FromRef<AppState> for JwtAuth {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}

impl AppState {
    fn build(
        repo: Arc<dyn TaskRepository>,
        resources: Vec<Arc<dyn Shutdown>>,
        config: &Config,
    ) -> Self {
        Self {
            tasks: TaskService::new(repo),
            auth: JwtAuth::new(&config.jwt_secret),
            request_timeout: config.request_timeout(),
            resources: Arc::new(resources),
        }
    }

    /// Closes the store and cache clients.
    ///
    /// Failures are logged and do not stop the remaining resources from
    /// closing.
    pub async fn shutdown(&self) {
        for resource in self.resources.iter() {
            match resource.shutdown().await {
                Ok(()) => tracing::info!(resource = resource.name(), "Closed resource"),
                Err(err) => {
                    tracing::error!(resource = resource.name(), error = %err, "Failed to close resource")
                }
            }
        }
    }
}

// ============================================================================
// Factory functions for different backend combinations
// ============================================================================

#[cfg(all(feature = "sqlite", feature = "memory"))]
mod sqlite_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::{CachedTaskRepository, SqliteTaskStore};

    impl AppState {
        /// Creates AppState with SQLite storage and in-memory cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteTaskStore::new(&config.sqlite_path).await?);
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            let repo = CachedTaskRepository::new(store.clone(), cache.clone(), config.cache_ttl())
                .with_cache_timeout(config.cache_op_timeout());

            Ok(Self::build(
                Arc::new(repo),
                vec![store as Arc<dyn Shutdown>, cache as Arc<dyn Shutdown>],
                config,
            ))
        }
    }
}

#[cfg(all(feature = "sqlite", feature = "redis"))]
mod sqlite_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::{CachedTaskRepository, SqliteTaskStore};

    impl AppState {
        /// Creates AppState with SQLite storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(SqliteTaskStore::new(&config.sqlite_path).await?);
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            let repo = CachedTaskRepository::new(store.clone(), cache.clone(), config.cache_ttl())
                .with_cache_timeout(config.cache_op_timeout());

            Ok(Self::build(
                Arc::new(repo),
                vec![store as Arc<dyn Shutdown>, cache as Arc<dyn Shutdown>],
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "memory"))]
mod inmemory_memory {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::storage::{CachedTaskRepository, InMemoryTaskStore};

    impl AppState {
        /// Creates AppState with in-memory storage and cache.
        /// Useful for running without any external dependencies.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryTaskStore::new());
            let cache = Arc::new(MemoryCache::new(config.cache_max_entries));

            let repo = CachedTaskRepository::new(store.clone(), cache.clone(), config.cache_ttl())
                .with_cache_timeout(config.cache_op_timeout());

            Ok(Self::build(
                Arc::new(repo),
                vec![store as Arc<dyn Shutdown>, cache as Arc<dyn Shutdown>],
                config,
            ))
        }
    }
}

#[cfg(all(feature = "inmemory", feature = "redis"))]
mod inmemory_redis {
    use super::*;
    use crate::cache::RedisCache;
    use crate::storage::{CachedTaskRepository, InMemoryTaskStore};

    impl AppState {
        /// Creates AppState with in-memory storage and Redis cache.
        pub async fn new(config: &Config) -> Result<Self, anyhow::Error> {
            let store = Arc::new(InMemoryTaskStore::new());
            let cache = Arc::new(RedisCache::new(&config.redis_url).await?);

            let repo = CachedTaskRepository::new(store.clone(), cache.clone(), config.cache_ttl())
                .with_cache_timeout(config.cache_op_timeout());

            Ok(Self::build(
                Arc::new(repo),
                vec![store as Arc<dyn Shutdown>, cache as Arc<dyn Shutdown>],
                config,
            ))
        }
    }
}

// ============================================================================
// Test support - in-memory state for unit tests
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::Utc;
    use tasktrack_core::task::CreateTaskRequest;

    struct Flaky {
        name: &'static str,
        fail: bool,
        closed: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Shutdown for Flaky {
        fn name(&self) -> &'static str {
            self.name
        }

        async fn shutdown(&self) -> anyhow::Result<()> {
            self.closed.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("{} refused to close", self.name);
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_shutdown_closes_every_resource() {
        let closed = Arc::new(AtomicUsize::new(0));
        let mut state = AppState::for_tests(&Config::default());
        state.resources = Arc::new(vec![
            Arc::new(Flaky {
                name: "store",
                fail: true,
                closed: closed.clone(),
            }) as Arc<dyn Shutdown>,
            Arc::new(Flaky {
                name: "cache",
                fail: false,
                closed: closed.clone(),
            }) as Arc<dyn Shutdown>,
        ]);

        state.shutdown().await;

        assert_eq!(closed.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_for_tests_state_round_trips_tasks() {
        let state = AppState::for_tests(&Config::default());

        let task = state
            .tasks
            .create_task(CreateTaskRequest::new(
                "From state",
                Utc::now() + chrono::Duration::hours(1),
            ))
            .await
            .unwrap();

        assert_eq!(state.tasks.get_task(task.id).await.unwrap(), task);

        state.shutdown().await;
    }
}
