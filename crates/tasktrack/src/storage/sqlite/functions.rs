//! Scalar SQL functions registered on every connection.

use rusqlite::functions::FunctionFlags;
use rusqlite::Connection;
use tasktrack_core::storage::fold_case;

/// Registers `fold_case(text)`, the Unicode-aware lowercase used by the
/// title search. SQLite's built-in `lower()` only folds ASCII.
pub fn register(conn: &Connection) -> rusqlite::Result<()> {
    conn.create_scalar_function(
        "fold_case",
        1,
        FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC,
        |ctx| {
            let text: Option<String> = ctx.get(0)?;
            Ok(text.map(|t| fold_case(&t)))
        },
    )
}
