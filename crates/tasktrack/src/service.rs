//! Task business rules on top of a `TaskRepository`.
//!
//! Requests are validated before the repository is touched, so a rejected
//! request never costs a store or cache round trip.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use tasktrack_core::storage::{Pagination, RepositoryError, TaskRepository};
use tasktrack_core::task::{
    clamp_limit, list_pagination, overdue_threshold, upcoming_filter, validate_create,
    validate_update, CreateTaskRequest, ListTasksQuery, Task, TaskError, UpdateTaskRequest,
    DEFAULT_UPCOMING_LIMIT,
};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] TaskError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

#[derive(Clone)]
pub struct TaskService {
    repo: Arc<dyn TaskRepository>,
}

impl TaskService {
    pub fn new(repo: Arc<dyn TaskRepository>) -> Self {
        Self { repo }
    }

    pub async fn create_task(&self, request: CreateTaskRequest) -> Result<Task> {
        validate_create(&request, Utc::now()).inspect_err(|err| {
            tracing::warn!(error = %err, "Rejected create task request");
        })?;

        let task = self.repo.create_task(request.into_new_task()).await?;
        tracing::info!(task_id = %task.id, title = %task.title, "Created task");
        Ok(task)
    }

    pub async fn get_task(&self, id: Uuid) -> Result<Task> {
        Ok(self.repo.get_task(id).await?)
    }

    /// Validates every present field, then loads the task, applies the patch
    /// and persists it.
    pub async fn update_task(&self, id: Uuid, request: UpdateTaskRequest) -> Result<Task> {
        validate_update(&request, Utc::now()).inspect_err(|err| {
            tracing::warn!(task_id = %id, error = %err, "Rejected update task request");
        })?;

        let mut task = self.repo.get_task(id).await?;
        request.apply_to(&mut task);

        let updated = self.repo.update_task(&task).await?;
        tracing::info!(task_id = %id, status = %updated.status, "Updated task");
        Ok(updated)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<()> {
        self.repo.delete_task(id).await?;
        tracing::info!(task_id = %id, "Deleted task");
        Ok(())
    }

    pub async fn list_tasks(&self, query: &ListTasksQuery) -> Result<Vec<Task>> {
        let pagination = list_pagination(query.limit, query.offset);
        Ok(self.repo.list_tasks(&query.filter(), pagination).await?)
    }

    /// Pending tasks ordered by due date, soonest first.
    pub async fn upcoming_tasks(&self, limit: Option<i64>) -> Result<Vec<Task>> {
        let limit = clamp_limit(limit, DEFAULT_UPCOMING_LIMIT);
        let pagination = Pagination::new(limit, 0);
        Ok(self.repo.list_tasks(&upcoming_filter(), pagination).await?)
    }

    /// Unfinished tasks whose due date passed more than a day ago.
    pub async fn overdue_tasks(&self) -> Result<Vec<Task>> {
        let threshold = overdue_threshold(Utc::now());
        Ok(self.repo.get_overdue_tasks(threshold).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use chrono::{DateTime, Duration};

    use tasktrack_core::storage::TaskFilter;
    use tasktrack_core::task::{NewTask, TaskPriority, TaskStatus};

    use crate::storage::inmemory::InMemoryTaskStore;

    // Repository that counts every call before delegating
    #[derive(Default)]
    struct CountingRepository {
        inner: InMemoryTaskStore,
        calls: AtomicUsize,
        last_pagination: std::sync::Mutex<Option<Pagination>>,
    }

    impl CountingRepository {
        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn touch(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn last_pagination(&self) -> Option<Pagination> {
            *self.last_pagination.lock().unwrap()
        }
    }

    #[async_trait]
    impl TaskRepository for CountingRepository {
        async fn create_task(&self, new_task: NewTask) -> tasktrack_core::storage::Result<Task> {
            self.touch();
            self.inner.create_task(new_task).await
        }

        async fn get_task(&self, id: Uuid) -> tasktrack_core::storage::Result<Task> {
            self.touch();
            self.inner.get_task(id).await
        }

        async fn update_task(&self, task: &Task) -> tasktrack_core::storage::Result<Task> {
            self.touch();
            self.inner.update_task(task).await
        }

        async fn delete_task(&self, id: Uuid) -> tasktrack_core::storage::Result<()> {
            self.touch();
            self.inner.delete_task(id).await
        }

        async fn list_tasks(
            &self,
            filter: &TaskFilter,
            pagination: Pagination,
        ) -> tasktrack_core::storage::Result<Vec<Task>> {
            self.touch();
            *self.last_pagination.lock().unwrap() = Some(pagination);
            self.inner.list_tasks(filter, pagination).await
        }

        async fn get_overdue_tasks(
            &self,
            threshold: DateTime<Utc>,
        ) -> tasktrack_core::storage::Result<Vec<Task>> {
            self.touch();
            self.inner.get_overdue_tasks(threshold).await
        }
    }

    fn service() -> (TaskService, Arc<CountingRepository>) {
        let repo = Arc::new(CountingRepository::default());
        (TaskService::new(repo.clone()), repo)
    }

    fn tomorrow() -> DateTime<Utc> {
        Utc::now() + Duration::days(1)
    }

    #[tokio::test]
    async fn test_create_task_defaults() {
        let (service, _) = service();

        let task = service
            .create_task(CreateTaskRequest::new("Plan sprint", tomorrow()))
            .await
            .unwrap();

        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, TaskPriority::Medium);
        assert_eq!(service.get_task(task.id).await.unwrap(), task);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_without_repository_call() {
        let (service, repo) = service();
        let cases = [
            (CreateTaskRequest::new("   ", tomorrow()), TaskError::EmptyTitle),
            (
                CreateTaskRequest::new("x".repeat(101), tomorrow()),
                TaskError::TitleTooLong,
            ),
            (
                CreateTaskRequest::new("ok", tomorrow()).with_description("d".repeat(501)),
                TaskError::DescriptionTooLong,
            ),
            (
                CreateTaskRequest::new("ok", Utc::now() - Duration::minutes(5)),
                TaskError::DueDateInPast,
            ),
            (
                CreateTaskRequest::new("ok", Utc::now() + Duration::days(365 * 8000)),
                TaskError::DueDateOutOfRange,
            ),
        ];

        for (request, expected) in cases {
            let err = service.create_task(request).await.unwrap_err();
            assert_eq!(err, ServiceError::Validation(expected));
        }

        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_create_tolerates_recent_past_due_date() {
        let (service, _) = service();

        let result = service
            .create_task(CreateTaskRequest::new(
                "Just missed",
                Utc::now() - Duration::seconds(30),
            ))
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_update_applies_only_present_fields() {
        let (service, _) = service();
        let task = service
            .create_task(
                CreateTaskRequest::new("Original", tomorrow())
                    .with_description("keep me")
                    .with_priority(TaskPriority::High),
            )
            .await
            .unwrap();

        let updated = service
            .update_task(task.id, UpdateTaskRequest::new().with_status(TaskStatus::Done))
            .await
            .unwrap();

        assert_eq!(updated.status, TaskStatus::Done);
        assert_eq!(updated.title, "Original");
        assert_eq!(updated.description.as_deref(), Some("keep me"));
        assert_eq!(updated.priority, TaskPriority::High);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_update_rejects_past_due_date_without_repository_call() {
        let (service, repo) = service();
        let task = service
            .create_task(CreateTaskRequest::new("Keep", tomorrow()))
            .await
            .unwrap();
        let calls_before = repo.calls();

        let err = service
            .update_task(
                task.id,
                UpdateTaskRequest::new().with_due_date(Utc::now() - Duration::seconds(1)),
            )
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Validation(TaskError::DueDateInPast));
        assert_eq!(repo.calls(), calls_before);
    }

    #[tokio::test]
    async fn test_update_rejects_empty_title() {
        let (service, repo) = service();

        let err = service
            .update_task(Uuid::new_v4(), UpdateTaskRequest::new().with_title(""))
            .await
            .unwrap_err();

        assert_eq!(err, ServiceError::Validation(TaskError::EmptyTitle));
        assert_eq!(repo.calls(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_task_is_not_found() {
        let (service, _) = service();
        let id = Uuid::new_v4();

        let err = service
            .update_task(id, UpdateTaskRequest::new().with_title("anything"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Repository(RepositoryError::task_not_found(id))
        );
    }

    #[tokio::test]
    async fn test_delete_then_get() {
        let (service, _) = service();
        let task = service
            .create_task(CreateTaskRequest::new("Short-lived", tomorrow()))
            .await
            .unwrap();

        service.delete_task(task.id).await.unwrap();

        let err = service.get_task(task.id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Repository(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_list_clamps_limit() {
        let (service, repo) = service();

        for limit in [Some(0), Some(101), Some(-3), None] {
            let query = ListTasksQuery {
                limit,
                ..Default::default()
            };
            service.list_tasks(&query).await.unwrap();
            assert_eq!(repo.last_pagination(), Some(Pagination::new(50, 0)));
        }

        let query = ListTasksQuery {
            limit: Some(100),
            offset: Some(-5),
            ..Default::default()
        };
        service.list_tasks(&query).await.unwrap();
        assert_eq!(repo.last_pagination(), Some(Pagination::new(100, 0)));
    }

    #[tokio::test]
    async fn test_upcoming_returns_pending_by_due_date() {
        let (service, repo) = service();
        let later = service
            .create_task(CreateTaskRequest::new("later", Utc::now() + Duration::days(3)))
            .await
            .unwrap();
        let sooner = service
            .create_task(CreateTaskRequest::new("sooner", Utc::now() + Duration::days(1)))
            .await
            .unwrap();
        let finished = service
            .create_task(CreateTaskRequest::new("finished", Utc::now() + Duration::hours(1)))
            .await
            .unwrap();
        service
            .update_task(finished.id, UpdateTaskRequest::new().with_status(TaskStatus::Done))
            .await
            .unwrap();

        let upcoming = service.upcoming_tasks(Some(500)).await.unwrap();

        let ids: Vec<Uuid> = upcoming.iter().map(|t| t.id).collect();
        assert_eq!(ids, vec![sooner.id, later.id]);
        assert_eq!(repo.last_pagination(), Some(Pagination::new(10, 0)));
    }

    #[tokio::test]
    async fn test_overdue_uses_one_day_threshold() {
        let repo = Arc::new(CountingRepository::default());
        let service = TaskService::new(repo.clone());
        let stale = repo
            .inner
            .create_task(NewTask::new("stale", Utc::now() - Duration::hours(30)))
            .await
            .unwrap();
        repo.inner
            .create_task(NewTask::new("recent", Utc::now() - Duration::hours(2)))
            .await
            .unwrap();

        let overdue = service.overdue_tasks().await.unwrap();

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, stale.id);
        let everything = repo
            .inner
            .list_tasks(&TaskFilter::new(), Pagination::default())
            .await
            .unwrap();
        assert_eq!(everything.len(), 2);
    }
}
