mod error;
mod operations;
mod requests;
mod types;

pub use error::TaskError;
pub use operations::{
    clamp_limit, is_overdue, list_pagination, normalize_description, overdue_tasks,
    overdue_threshold, query_tasks, sort_by_due_date, upcoming_filter, validate_create,
    validate_update, CREATE_DUE_DATE_TOLERANCE, DEFAULT_LIST_LIMIT, DEFAULT_UPCOMING_LIMIT,
    MAX_DESCRIPTION_LEN, MAX_PAGE_LIMIT, MAX_TITLE_LEN, OVERDUE_AFTER,
};
pub use requests::{CreateTaskRequest, ListTasksQuery, UpcomingTasksQuery, UpdateTaskRequest};
pub use types::{normalize_timestamp, NewTask, Task, TaskPriority, TaskStatus};
