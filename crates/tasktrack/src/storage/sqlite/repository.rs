//! SQLite task store.
//!
//! Implements `TaskRepository` from `tasktrack_core::storage` using SQLite.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio_rusqlite::Connection;
use uuid::Uuid;

use tasktrack_core::storage::{Pagination, RepositoryError, Result, TaskFilter, TaskRepository};
use tasktrack_core::task::{NewTask, Task};

use super::conversions::{format_datetime, row_to_task};
use super::error::{map_tokio_rusqlite_error, map_tokio_rusqlite_error_with_id};
use super::{functions, schema};
use crate::lifecycle::Shutdown;

/// Helper to wrap rusqlite errors for tokio_rusqlite closures.
fn wrap_err(e: rusqlite::Error) -> tokio_rusqlite::Error {
    tokio_rusqlite::Error::Rusqlite(e)
}

/// SQLite-backed task store; the source of truth for task state.
#[derive(Clone)]
pub struct SqliteTaskStore {
    conn: Connection,
}

impl SqliteTaskStore {
    /// Opens (or creates) a file-based database and ensures the schema exists.
    pub async fn new(path: &str) -> Result<Self> {
        let conn = Connection::open(path)
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_connection(&conn).await?;

        tracing::debug!(path, "Opened SQLite task store");
        Ok(Self { conn })
    }

    /// Creates a store on an in-memory database.
    ///
    /// Useful for testing - data is lost when the connection is dropped.
    pub async fn new_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .await
            .map_err(|e| RepositoryError::ConnectionFailed(e.to_string()))?;

        Self::init_connection(&conn).await?;

        Ok(Self { conn })
    }

    async fn init_connection(conn: &Connection) -> Result<()> {
        conn.call(|conn| {
            functions::register(conn).map_err(wrap_err)?;
            conn.execute_batch(schema::CREATE_TABLES)
                .map_err(wrap_err)?;
            Ok(())
        })
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))
    }
}

#[async_trait]
impl TaskRepository for SqliteTaskStore {
    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let task = Task::create(new_task, Utc::now());
        let row = task.clone();

        self.conn
            .call(move |conn| {
                conn.execute(
                    schema::INSERT_TASK,
                    rusqlite::params![
                        row.id.to_string(),
                        row.title,
                        row.description,
                        row.status.as_str(),
                        row.priority.as_str(),
                        format_datetime(&row.due_date),
                        format_datetime(&row.created_at),
                        format_datetime(&row.updated_at),
                    ],
                )
                .map_err(wrap_err)?;
                Ok(())
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, task.id.to_string()))?;

        Ok(task)
    }

    async fn get_task(&self, id: Uuid) -> Result<Task> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let mut stmt = conn.prepare(schema::SELECT_TASK_BY_ID).map_err(wrap_err)?;
                let task = stmt.query_row([&id_str], row_to_task).map_err(wrap_err)?;
                Ok(task)
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id.to_string()))
    }

    async fn update_task(&self, task: &Task) -> Result<Task> {
        let mut updated = task.clone();
        updated.touch(Utc::now());
        let row = updated.clone();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(
                        schema::UPDATE_TASK,
                        rusqlite::params![
                            row.id.to_string(),
                            row.title,
                            row.description,
                            row.status.as_str(),
                            row.priority.as_str(),
                            format_datetime(&row.due_date),
                            format_datetime(&row.updated_at),
                        ],
                    )
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, task.id.to_string()))?;

        Ok(updated)
    }

    async fn delete_task(&self, id: Uuid) -> Result<()> {
        let id_str = id.to_string();

        self.conn
            .call(move |conn| {
                let rows = conn
                    .execute(schema::DELETE_TASK, [&id_str])
                    .map_err(wrap_err)?;
                if rows == 0 {
                    Err(wrap_err(rusqlite::Error::QueryReturnedNoRows))
                } else {
                    Ok(())
                }
            })
            .await
            .map_err(|e| map_tokio_rusqlite_error_with_id(e, id.to_string()))
    }

    async fn list_tasks(&self, filter: &TaskFilter, pagination: Pagination) -> Result<Vec<Task>> {
        let status = filter.status.map(|s| s.as_str());
        let priority = filter.priority.map(|p| p.as_str());
        let search = filter.search.clone();

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_TASKS_FILTERED)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![
                            status,
                            priority,
                            search,
                            pagination.limit,
                            pagination.offset
                        ],
                        row_to_task,
                    )
                    .map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(tasks)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }

    async fn get_overdue_tasks(&self, threshold: DateTime<Utc>) -> Result<Vec<Task>> {
        let threshold = format_datetime(&threshold);

        self.conn
            .call(move |conn| {
                let mut stmt = conn
                    .prepare(schema::SELECT_OVERDUE_TASKS)
                    .map_err(wrap_err)?;
                let rows = stmt
                    .query_map([&threshold], row_to_task)
                    .map_err(wrap_err)?;

                let mut tasks = Vec::new();
                for row_result in rows {
                    tasks.push(row_result.map_err(wrap_err)?);
                }
                Ok(tasks)
            })
            .await
            .map_err(map_tokio_rusqlite_error)
    }
}

#[async_trait]
impl Shutdown for SqliteTaskStore {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    async fn shutdown(&self) -> anyhow::Result<()> {
        self.conn
            .clone()
            .close()
            .await
            .map_err(map_tokio_rusqlite_error)?;
        Ok(())
    }
}
