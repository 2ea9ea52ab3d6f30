//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and domain types.
//! These are testable in isolation without database access.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

use tasktrack_core::task::{Task, TaskPriority, TaskStatus};

/// Convert a SQLite row to a Task.
///
/// Expected columns: id, title, description, status, priority, due_date, created_at, updated_at
pub fn row_to_task(row: &Row) -> rusqlite::Result<Task> {
    let id: String = row.get(0)?;
    let title: String = row.get(1)?;
    let description: Option<String> = row.get(2)?;
    let status: String = row.get(3)?;
    let priority: String = row.get(4)?;
    let due_date: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let updated_at: String = row.get(7)?;

    Ok(Task {
        id: parse_uuid(0, &id)?,
        title,
        description,
        status: parse_enum::<TaskStatus>(3, &status)?,
        priority: parse_enum::<TaskPriority>(4, &priority)?,
        due_date: parse_datetime(5, &due_date)?,
        created_at: parse_datetime(6, &created_at)?,
        updated_at: parse_datetime(7, &updated_at)?,
    })
}

fn conversion_failure(
    column: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_uuid(column: usize, s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s).map_err(|e| conversion_failure(column, e))
}

fn parse_enum<T>(column: usize, s: &str) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    s.parse::<T>().map_err(|e| conversion_failure(column, e))
}

fn parse_datetime(column: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| conversion_failure(column, e))
}

/// Format a DateTime<Utc> for SQLite storage.
///
/// Always 27 characters (`YYYY-MM-DDTHH:MM:SS.ffffffZ`) so text comparison
/// orders chronologically.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}
