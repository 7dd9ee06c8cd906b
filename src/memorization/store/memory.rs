//! In-process [`ProgressStore`] backed by a `BTreeMap`.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

use super::ProgressStore;
use crate::memorization::error::Result;
use crate::memorization::types::{MemorizationItem, UserId, VerseKey};

/// Keeps items ordered by `(user, chapter, verse)`.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    items: BTreeMap<(UserId, VerseKey), MemorizationItem>,
}

impl MemoryStore {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn user_items<'a>(&'a self, user: &'a UserId) -> impl Iterator<Item = &'a MemorizationItem> {
        self.items
            .iter()
            .filter(move |((owner, _), _)| owner == user)
            .map(|(_, item)| item)
    }
}

impl ProgressStore for MemoryStore {
    fn get(&self, user: &UserId, key: VerseKey) -> Result<Option<MemorizationItem>> {
        Ok(self.items.get(&(user.clone(), key)).cloned())
    }

    fn insert_if_absent(&mut self, item: MemorizationItem) -> Result<(MemorizationItem, bool)> {
        let slot = (item.user_id.clone(), item.key);
        if let Some(existing) = self.items.get(&slot) {
            return Ok((existing.clone(), false));
        }
        self.items.insert(slot, item.clone());
        Ok((item, true))
    }

    fn modify(
        &mut self,
        user: &UserId,
        key: VerseKey,
        update: &mut dyn FnMut(&mut MemorizationItem) -> Result<()>,
    ) -> Result<Option<MemorizationItem>> {
        let Some(item) = self.items.get_mut(&(user.clone(), key)) else {
            return Ok(None);
        };
        let mut updated = item.clone();
        update(&mut updated)?;
        *item = updated.clone();
        Ok(Some(updated))
    }

    fn delete(&mut self, user: &UserId, key: VerseKey) -> Result<bool> {
        Ok(self.items.remove(&(user.clone(), key)).is_some())
    }

    fn list(&self, user: &UserId) -> Result<Vec<MemorizationItem>> {
        Ok(self.user_items(user).cloned().collect())
    }

    fn due(&self, user: &UserId, now: DateTime<Utc>) -> Result<Vec<MemorizationItem>> {
        let mut due: Vec<MemorizationItem> = self
            .user_items(user)
            .filter(|item| item.is_due(now))
            .cloned()
            .collect();
        due.sort_by_key(|item| (item.next_review_date, item.key));
        Ok(due)
    }

    fn list_all(&self) -> Result<Vec<MemorizationItem>> {
        Ok(self.items.values().cloned().collect())
    }
}
