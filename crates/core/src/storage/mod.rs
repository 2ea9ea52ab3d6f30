mod error;
mod http_mapping;
mod traits;
mod types;

pub use error::{RepositoryError, Result};
pub use http_mapping::{repository_error_to_status_code, task_error_to_status_code};
pub use traits::TaskRepository;
pub use types::{fold_case, Pagination, TaskFilter};
