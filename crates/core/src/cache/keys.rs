use uuid::Uuid;

/// Namespace prefix for task cache keys.
pub const TASK_KEY_PREFIX: &str = "task:";

/// Returns the cache key for a single task.
///
/// # Examples
///
/// ```
/// use tasktrack_core::cache::task_key;
/// use uuid::Uuid;
///
/// assert_eq!(
///     task_key(Uuid::nil()),
///     "task:00000000-0000-0000-0000-000000000000"
/// );
/// ```
pub fn task_key(task_id: Uuid) -> String {
    format!("{TASK_KEY_PREFIX}{task_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_key_is_deterministic() {
        let id = Uuid::new_v4();
        assert_eq!(task_key(id), task_key(id));
        assert_eq!(task_key(id), format!("task:{}", id));
    }

    #[test]
    fn test_distinct_ids_have_distinct_keys() {
        assert_ne!(task_key(Uuid::new_v4()), task_key(Uuid::new_v4()));
    }
}
