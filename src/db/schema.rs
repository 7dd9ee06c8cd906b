//! SQL DDL for all Shloka tables.
//!
//! Defines the `memorization`, `memorization_log`, and `schema_meta` tables.
//! All DDL uses `IF NOT EXISTS` for idempotent initialization.

use rusqlite::Connection;

/// All schema DDL statements for the v1 tables.
const SCHEMA_SQL: &str = r#"
-- One row per verse a user is memorizing
CREATE TABLE IF NOT EXISTS memorization (
    id TEXT NOT NULL UNIQUE,
    user_id TEXT NOT NULL,
    chapter_number INTEGER NOT NULL CHECK(chapter_number >= 1),
    verse_number INTEGER NOT NULL CHECK(verse_number >= 1),
    box INTEGER NOT NULL DEFAULT 1 CHECK(box >= 1),
    next_review_date TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (user_id, chapter_number, verse_number)
);

CREATE INDEX IF NOT EXISTS idx_memorization_user ON memorization(user_id);

-- Audit log
CREATE TABLE IF NOT EXISTS memorization_log (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    operation TEXT NOT NULL CHECK(operation IN ('start','review','remove')),
    user_id TEXT NOT NULL,
    chapter_number INTEGER NOT NULL,
    verse_number INTEGER NOT NULL,
    details TEXT,
    created_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_log_user ON memorization_log(user_id);

-- Schema metadata
CREATE TABLE IF NOT EXISTS schema_meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);
"#;

/// Initialize all schema tables. Idempotent (uses IF NOT EXISTS).
pub fn init_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;

    // Set initial schema version if not already present
    conn.execute(
        "INSERT OR IGNORE INTO schema_meta (key, value) VALUES ('schema_version', '1')",
        [],
    )?;

    Ok(())
}
