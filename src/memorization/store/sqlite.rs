//! SQLite-backed [`ProgressStore`].
//!
//! Every mutation runs inside a transaction together with its audit log entry.
//! Timestamps are stored as fixed-width RFC 3339 UTC strings with microsecond
//! precision, so comparing the text columns compares the instants.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use super::ProgressStore;
use crate::memorization::error::Result;
use crate::memorization::types::{MemorizationItem, UserId, VerseKey};

const ITEM_COLUMNS: &str = "id, user_id, chapter_number, verse_number, box, \
                            next_review_date, created_at, review_count, last_reviewed_at";

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Wrap a connection whose schema and migrations are already applied.
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Open (or create) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_database(path)?))
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Ok(Self::new(crate::db::open_memory_database()?))
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

/// Format a timestamp for storage: `2026-10-19T08:30:00.000000Z`.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(idx: usize, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn row_to_item(row: &Row<'_>) -> rusqlite::Result<MemorizationItem> {
    let user_id: String = row.get(1)?;
    let next_review_date: String = row.get(5)?;
    let created_at: String = row.get(6)?;
    let last_reviewed_at: Option<String> = row.get(8)?;

    Ok(MemorizationItem {
        id: row.get(0)?,
        user_id: UserId::new(&user_id).map_err(|_| rusqlite::Error::InvalidQuery)?,
        key: VerseKey {
            chapter_number: row.get(2)?,
            verse_number: row.get(3)?,
        },
        box_level: row.get(4)?,
        next_review_date: parse_timestamp(5, &next_review_date)?,
        created_at: parse_timestamp(6, &created_at)?,
        review_count: row.get(7)?,
        last_reviewed_at: last_reviewed_at
            .map(|raw| parse_timestamp(8, &raw))
            .transpose()?,
    })
}

fn select_item(conn: &Connection, user: &UserId, key: VerseKey) -> rusqlite::Result<Option<MemorizationItem>> {
    conn.query_row(
        &format!(
            "SELECT {ITEM_COLUMNS} FROM memorization \
             WHERE user_id = ?1 AND chapter_number = ?2 AND verse_number = ?3"
        ),
        params![user.as_str(), key.chapter_number, key.verse_number],
        row_to_item,
    )
    .optional()
}

fn query_items(
    conn: &Connection,
    sql: &str,
    params: impl rusqlite::Params,
) -> rusqlite::Result<Vec<MemorizationItem>> {
    let mut stmt = conn.prepare(sql)?;
    let items = stmt
        .query_map(params, row_to_item)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(items)
}

/// Write an entry to the memorization_log audit table.
pub(crate) fn write_audit_log(
    conn: &Connection,
    operation: &str,
    user: &UserId,
    key: VerseKey,
    details: Option<&serde_json::Value>,
) -> rusqlite::Result<()> {
    let now = format_timestamp(Utc::now());
    let details_json = details.map(|d| d.to_string());
    conn.execute(
        "INSERT INTO memorization_log (operation, user_id, chapter_number, verse_number, details, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            operation,
            user.as_str(),
            key.chapter_number,
            key.verse_number,
            details_json,
            now
        ],
    )?;
    Ok(())
}

impl ProgressStore for SqliteStore {
    fn get(&self, user: &UserId, key: VerseKey) -> Result<Option<MemorizationItem>> {
        Ok(select_item(&self.conn, user, key)?)
    }

    fn insert_if_absent(&mut self, item: MemorizationItem) -> Result<(MemorizationItem, bool)> {
        let tx = self.conn.transaction()?;

        let created_at = format_timestamp(item.created_at);
        let inserted = tx.execute(
            "INSERT OR IGNORE INTO memorization \
             (id, user_id, chapter_number, verse_number, box, next_review_date, created_at, updated_at, review_count, last_reviewed_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7, ?8, ?9)",
            params![
                item.id,
                item.user_id.as_str(),
                item.key.chapter_number,
                item.key.verse_number,
                item.box_level,
                format_timestamp(item.next_review_date),
                created_at,
                item.review_count,
                item.last_reviewed_at.map(format_timestamp),
            ],
        )? == 1;

        if inserted {
            write_audit_log(&tx, "start", &item.user_id, item.key, None)?;
        }

        let stored = select_item(&tx, &item.user_id, item.key)?.ok_or_else(|| {
            crate::memorization::error::MemorizationError::StorageUnavailable(format!(
                "item {} vanished during insert",
                item.key
            ))
        })?;

        tx.commit()?;
        Ok((stored, inserted))
    }

    fn modify(
        &mut self,
        user: &UserId,
        key: VerseKey,
        update: &mut dyn FnMut(&mut MemorizationItem) -> Result<()>,
    ) -> Result<Option<MemorizationItem>> {
        let tx = self.conn.transaction()?;

        let Some(mut item) = select_item(&tx, user, key)? else {
            return Ok(None);
        };
        let before = item.box_level;
        update(&mut item)?;

        tx.execute(
            "UPDATE memorization SET box = ?1, next_review_date = ?2, review_count = ?3, \
             last_reviewed_at = ?4, updated_at = ?5 \
             WHERE user_id = ?6 AND chapter_number = ?7 AND verse_number = ?8",
            params![
                item.box_level,
                format_timestamp(item.next_review_date),
                item.review_count,
                item.last_reviewed_at.map(format_timestamp),
                format_timestamp(Utc::now()),
                user.as_str(),
                key.chapter_number,
                key.verse_number,
            ],
        )?;

        let details = serde_json::json!({
            "from_box": before,
            "to_box": item.box_level,
            "next_review_date": format_timestamp(item.next_review_date),
        });
        write_audit_log(&tx, "review", user, key, Some(&details))?;

        tx.commit()?;
        Ok(Some(item))
    }

    fn delete(&mut self, user: &UserId, key: VerseKey) -> Result<bool> {
        let tx = self.conn.transaction()?;

        let removed = tx.execute(
            "DELETE FROM memorization WHERE user_id = ?1 AND chapter_number = ?2 AND verse_number = ?3",
            params![user.as_str(), key.chapter_number, key.verse_number],
        )? > 0;

        if removed {
            write_audit_log(&tx, "remove", user, key, None)?;
        }

        tx.commit()?;
        Ok(removed)
    }

    fn list(&self, user: &UserId) -> Result<Vec<MemorizationItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM memorization WHERE user_id = ?1 \
             ORDER BY chapter_number, verse_number"
        );
        Ok(query_items(&self.conn, &sql, params![user.as_str()])?)
    }

    fn due(&self, user: &UserId, now: DateTime<Utc>) -> Result<Vec<MemorizationItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM memorization \
             WHERE user_id = ?1 AND next_review_date <= ?2 \
             ORDER BY next_review_date, chapter_number, verse_number"
        );
        Ok(query_items(
            &self.conn,
            &sql,
            params![user.as_str(), format_timestamp(now)],
        )?)
    }

    fn list_all(&self) -> Result<Vec<MemorizationItem>> {
        let sql = format!(
            "SELECT {ITEM_COLUMNS} FROM memorization \
             ORDER BY user_id, chapter_number, verse_number"
        );
        Ok(query_items(&self.conn, &sql, [])?)
    }
}
