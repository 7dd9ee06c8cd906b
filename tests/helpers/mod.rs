#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use shloka::memorization::store::sqlite::SqliteStore;
use shloka::memorization::{LeitnerSchedule, Scheduler, UserId, VerseKey};

/// Fresh in-memory SQLite store with schema and migrations applied.
pub fn test_store() -> SqliteStore {
    SqliteStore::open_in_memory().unwrap()
}

/// Scheduler over [`test_store`] with the default Leitner table.
pub fn test_scheduler() -> Scheduler<SqliteStore> {
    Scheduler::new(test_store(), LeitnerSchedule::default())
}

/// Fixed reference instant so schedules are deterministic.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

pub fn user(name: &str) -> UserId {
    UserId::new(name).unwrap()
}

pub fn key(chapter: i64, verse: i64) -> VerseKey {
    VerseKey::new(chapter, verse).unwrap()
}
