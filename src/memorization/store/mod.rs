//! Persistence contract for memorization progress.
//!
//! Provides the [`ProgressStore`] trait plus a SQLite implementation
//! ([`sqlite::SqliteStore`]) and an in-memory one ([`memory::MemoryStore`]).
//! The store is created via [`create_store`] from configuration.

pub mod memory;
pub mod sqlite;

use anyhow::Result;
use chrono::{DateTime, Utc};

use super::error::Result as StoreResult;
use super::types::{MemorizationItem, UserId, VerseKey};

/// Storage for [`MemorizationItem`]s keyed by `(user, chapter, verse)`.
///
/// Every method touches a single user's data. All methods are synchronous —
/// callers in async contexts should use `tokio::task::spawn_blocking`.
pub trait ProgressStore: Send {
    /// Look up one item, `None` if the user is not memorizing that verse.
    fn get(&self, user: &UserId, key: VerseKey) -> StoreResult<Option<MemorizationItem>>;

    /// Insert `item` unless its key already exists. Returns the stored record
    /// and whether it was newly created.
    fn insert_if_absent(&mut self, item: MemorizationItem) -> StoreResult<(MemorizationItem, bool)>;

    /// Atomic read-modify-write of one record. Returns `None` without calling
    /// `update` if the key is absent; an error from `update` leaves the record
    /// untouched.
    fn modify(
        &mut self,
        user: &UserId,
        key: VerseKey,
        update: &mut dyn FnMut(&mut MemorizationItem) -> StoreResult<()>,
    ) -> StoreResult<Option<MemorizationItem>>;

    /// Hard delete. Returns whether a record was removed.
    fn delete(&mut self, user: &UserId, key: VerseKey) -> StoreResult<bool>;

    /// All of a user's items, ordered by chapter then verse.
    fn list(&self, user: &UserId) -> StoreResult<Vec<MemorizationItem>>;

    /// A user's items with `next_review_date <= now`, ordered by
    /// `next_review_date`, then chapter, then verse.
    fn due(&self, user: &UserId, now: DateTime<Utc>) -> StoreResult<Vec<MemorizationItem>>;

    /// Every item of every user, ordered by user, chapter, verse.
    fn list_all(&self) -> StoreResult<Vec<MemorizationItem>>;
}

impl<S: ProgressStore + ?Sized> ProgressStore for Box<S> {
    fn get(&self, user: &UserId, key: VerseKey) -> StoreResult<Option<MemorizationItem>> {
        (**self).get(user, key)
    }

    fn insert_if_absent(&mut self, item: MemorizationItem) -> StoreResult<(MemorizationItem, bool)> {
        (**self).insert_if_absent(item)
    }

    fn modify(
        &mut self,
        user: &UserId,
        key: VerseKey,
        update: &mut dyn FnMut(&mut MemorizationItem) -> StoreResult<()>,
    ) -> StoreResult<Option<MemorizationItem>> {
        (**self).modify(user, key, update)
    }

    fn delete(&mut self, user: &UserId, key: VerseKey) -> StoreResult<bool> {
        (**self).delete(user, key)
    }

    fn list(&self, user: &UserId) -> StoreResult<Vec<MemorizationItem>> {
        (**self).list(user)
    }

    fn due(&self, user: &UserId, now: DateTime<Utc>) -> StoreResult<Vec<MemorizationItem>> {
        (**self).due(user, now)
    }

    fn list_all(&self) -> StoreResult<Vec<MemorizationItem>> {
        (**self).list_all()
    }
}

/// Create a progress store from config.
///
/// `"sqlite"` opens (or creates) the database at `storage.db_path`;
/// `"memory"` keeps everything in process and loses it on exit.
pub fn create_store(config: &crate::config::ShlokaConfig) -> Result<Box<dyn ProgressStore>> {
    match config.storage.backend.as_str() {
        "sqlite" => {
            let store = sqlite::SqliteStore::open(config.resolved_db_path())?;
            Ok(Box::new(store))
        }
        "memory" => {
            tracing::warn!("using in-memory store, progress will not survive a restart");
            Ok(Box::new(memory::MemoryStore::default()))
        }
        other => anyhow::bail!("unknown storage backend: {other}. Supported: sqlite, memory"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ShlokaConfig;

    #[test]
    fn create_store_rejects_unknown_backend() {
        let mut config = ShlokaConfig::default();
        config.storage.backend = "postgres".into();
        let err = create_store(&config).err().unwrap();
        assert!(err.to_string().contains("unknown storage backend"));
    }

    #[test]
    fn create_store_opens_sqlite_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut config = ShlokaConfig::default();
        config.storage.db_path = dir.path().join("progress.db").to_string_lossy().into_owned();

        let store = create_store(&config).unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(dir.path().join("progress.db").exists());
    }

    #[test]
    fn create_store_memory_backend() {
        let mut config = ShlokaConfig::default();
        config.storage.backend = "memory".into();
        let store = create_store(&config).unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }
}
