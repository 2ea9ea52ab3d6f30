use crate::task::{Task, TaskPriority, TaskStatus, DEFAULT_LIST_LIMIT};

/// Case folding used by every store for the title search.
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Optional list filters, combined with logical AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    /// Case-insensitive substring match on the title.
    pub search: Option<String>,
}

impl TaskFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_priority(mut self, priority: TaskPriority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Returns true if `task` satisfies every present criterion.
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|s| task.status == s)
            && self.priority.is_none_or(|p| task.priority == p)
            && self
                .search
                .as_deref()
                .is_none_or(|needle| fold_case(&task.title).contains(&fold_case(needle)))
    }
}

/// Limit/offset pagination, applied after filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub limit: u32,
    pub offset: u32,
}

impl Pagination {
    pub fn new(limit: u32, offset: u32) -> Self {
        Self { limit, offset }
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::NewTask;
    use chrono::Utc;

    fn task(title: &str, status: TaskStatus, priority: TaskPriority) -> Task {
        let now = Utc::now();
        Task::create(
            NewTask::new(title, now)
                .with_status(status)
                .with_priority(priority),
            now,
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let t = task("anything", TaskStatus::Done, TaskPriority::Low);
        assert!(TaskFilter::new().matches(&t));
    }

    #[test]
    fn test_filters_are_anded() {
        let t = task("Quarterly report", TaskStatus::Pending, TaskPriority::High);

        assert!(TaskFilter::new()
            .with_status(TaskStatus::Pending)
            .with_priority(TaskPriority::High)
            .matches(&t));
        assert!(!TaskFilter::new()
            .with_status(TaskStatus::Pending)
            .with_priority(TaskPriority::Low)
            .matches(&t));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let t = task("Quarterly Report", TaskStatus::Pending, TaskPriority::Low);

        assert!(TaskFilter::new().with_search("report").matches(&t));
        assert!(TaskFilter::new().with_search("TERLY").matches(&t));
        assert!(!TaskFilter::new().with_search("invoice").matches(&t));
    }

    #[test]
    fn test_default_pagination() {
        assert_eq!(Pagination::default(), Pagination::new(50, 0));
    }
}
