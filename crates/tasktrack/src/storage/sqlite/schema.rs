//! SQLite schema definitions and SQL query constants.
//!
//! Timestamps are stored as fixed-width RFC 3339 strings with microsecond
//! precision and a `Z` suffix, so lexicographic order equals time order and
//! `ORDER BY due_date` / `due_date < ?` work on the text column.

/// SQL statement to create all tables.
pub const CREATE_TABLES: &str = r#"
CREATE TABLE IF NOT EXISTS tasks (
    id TEXT PRIMARY KEY,
    title TEXT NOT NULL,
    description TEXT,
    status TEXT NOT NULL CHECK (status IN ('pending', 'in_progress', 'done')),
    priority TEXT NOT NULL CHECK (priority IN ('low', 'medium', 'high')),
    due_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_tasks_due_date ON tasks(due_date);
CREATE INDEX IF NOT EXISTS idx_tasks_status_due_date ON tasks(status, due_date);
"#;

pub const INSERT_TASK: &str = r#"
INSERT INTO tasks (id, title, description, status, priority, due_date, created_at, updated_at)
VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
"#;

pub const SELECT_TASK_BY_ID: &str = r#"
SELECT id, title, description, status, priority, due_date, created_at, updated_at
FROM tasks
WHERE id = ?1
"#;

pub const UPDATE_TASK: &str = r#"
UPDATE tasks
SET title = ?2, description = ?3, status = ?4, priority = ?5, due_date = ?6, updated_at = ?7
WHERE id = ?1
"#;

pub const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";

/// NULL parameters disable their criterion. `fold_case` is registered on
/// every connection by `functions::register`.
pub const SELECT_TASKS_FILTERED: &str = r#"
SELECT id, title, description, status, priority, due_date, created_at, updated_at
FROM tasks
WHERE (?1 IS NULL OR status = ?1)
  AND (?2 IS NULL OR priority = ?2)
  AND (?3 IS NULL OR instr(fold_case(title), fold_case(?3)) > 0)
ORDER BY due_date ASC, created_at ASC
LIMIT ?4 OFFSET ?5
"#;

pub const SELECT_OVERDUE_TASKS: &str = r#"
SELECT id, title, description, status, priority, due_date, created_at, updated_at
FROM tasks
WHERE due_date < ?1 AND status != 'done'
ORDER BY due_date ASC, created_at ASC
"#;
