//! The memorization scheduler.
//!
//! [`Scheduler`] owns a [`ProgressStore`] and a [`LeitnerSchedule`] and exposes
//! the due query plus the start / remove / review mutations. Every operation is
//! scoped to an explicit [`UserId`]. Each has an `_at` variant taking the
//! current instant, which the plain variant fills with `Utc::now()`.

use chrono::{DateTime, SubsecRound, Utc};

use super::error::{MemorizationError, Result};
use super::schedule::LeitnerSchedule;
use super::stats::{self, ProgressStats};
use super::store::ProgressStore;
use super::types::{MemorizationItem, ReviewOutcome, UserId, VerseKey};

pub struct Scheduler<S> {
    store: S,
    schedule: LeitnerSchedule,
}

/// Stored timestamps carry microseconds; keep `now` at the same precision so a
/// returned item equals what a later read yields.
fn current_instant(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(6)
}

impl<S: ProgressStore> Scheduler<S> {
    pub fn new(store: S, schedule: LeitnerSchedule) -> Self {
        Self { store, schedule }
    }

    pub fn schedule(&self) -> &LeitnerSchedule {
        &self.schedule
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Items owned by `user` whose `next_review_date <= now`, ordered by
    /// `next_review_date`, then chapter, then verse. No side effects.
    pub fn due_items(&self, user: &UserId) -> Result<Vec<MemorizationItem>> {
        self.due_items_at(user, Utc::now())
    }

    pub fn due_items_at(&self, user: &UserId, now: DateTime<Utc>) -> Result<Vec<MemorizationItem>> {
        let items = self.store.due(user, current_instant(now))?;
        tracing::debug!(user = %user, due = items.len(), "due items loaded");
        Ok(items)
    }

    /// Begin memorizing a verse. Idempotent: an existing item is returned
    /// unchanged.
    pub fn start_memorization(&mut self, user: &UserId, key: VerseKey) -> Result<MemorizationItem> {
        self.start_memorization_at(user, key, Utc::now())
    }

    pub fn start_memorization_at(
        &mut self,
        user: &UserId,
        key: VerseKey,
        now: DateTime<Utc>,
    ) -> Result<MemorizationItem> {
        self.ensure_memorizing_at(user, key, now).map(|(item, _)| item)
    }

    /// Like [`start_memorization`](Self::start_memorization), also reporting
    /// whether the item was newly created.
    pub fn ensure_memorizing(&mut self, user: &UserId, key: VerseKey) -> Result<(MemorizationItem, bool)> {
        self.ensure_memorizing_at(user, key, Utc::now())
    }

    pub fn ensure_memorizing_at(
        &mut self,
        user: &UserId,
        key: VerseKey,
        now: DateTime<Utc>,
    ) -> Result<(MemorizationItem, bool)> {
        let candidate = MemorizationItem::new(user.clone(), key, current_instant(now));
        let (item, created) = self.store.insert_if_absent(candidate)?;

        if created {
            tracing::info!(user = %user, verse = %key, "memorization started");
        } else {
            tracing::debug!(user = %user, verse = %key, box_level = item.box_level, "already memorizing");
        }
        Ok((item, created))
    }

    /// Stop memorizing a verse. Removing an untracked verse is a successful
    /// no-op; the return value says whether anything was deleted.
    pub fn remove_memorization(&mut self, user: &UserId, key: VerseKey) -> Result<bool> {
        let removed = self.store.delete(user, key)?;
        if removed {
            tracing::info!(user = %user, verse = %key, "memorization removed");
        } else {
            tracing::debug!(user = %user, verse = %key, "remove of untracked verse ignored");
        }
        Ok(removed)
    }

    /// Apply one review judgment: promote on correct, demote (floor 1) on
    /// incorrect, then set `next_review_date = now + interval(new box)`.
    pub fn record_review(&mut self, user: &UserId, key: VerseKey, is_correct: bool) -> Result<MemorizationItem> {
        self.record_review_at(user, key, is_correct, Utc::now())
    }

    pub fn record_review_at(
        &mut self,
        user: &UserId,
        key: VerseKey,
        is_correct: bool,
        now: DateTime<Utc>,
    ) -> Result<MemorizationItem> {
        let now = current_instant(now);
        let schedule = &self.schedule;
        let updated = self
            .store
            .modify(user, key, &mut |item: &mut MemorizationItem| {
                schedule.apply(item, is_correct, now)
            })
            .inspect_err(|e| tracing::warn!(user = %user, verse = %key, error = %e, "review not recorded"))?;

        let Some(item) = updated else {
            tracing::warn!(user = %user, verse = %key, "review for untracked verse");
            return Err(MemorizationError::ItemNotFound {
                user: user.to_string(),
                chapter: key.chapter_number,
                verse: key.verse_number,
            });
        };

        tracing::info!(
            user = %user,
            verse = %key,
            correct = is_correct,
            box_level = item.box_level,
            next_review = %item.next_review_date,
            "review recorded"
        );
        Ok(item)
    }

    /// [`record_review`](Self::record_review) for a packaged outcome.
    pub fn apply_outcome(&mut self, outcome: &ReviewOutcome) -> Result<MemorizationItem> {
        self.record_review(&outcome.user_id, outcome.key, outcome.is_correct)
    }

    /// Every verse the user is memorizing, ordered by chapter then verse.
    pub fn list_items(&self, user: &UserId) -> Result<Vec<MemorizationItem>> {
        self.store.list(user)
    }

    /// Memorization status of one verse, `None` if untracked.
    pub fn get_item(&self, user: &UserId, key: VerseKey) -> Result<Option<MemorizationItem>> {
        self.store.get(user, key)
    }

    pub fn stats(&self, user: &UserId) -> Result<ProgressStats> {
        self.stats_at(user, Utc::now())
    }

    pub fn stats_at(&self, user: &UserId, now: DateTime<Utc>) -> Result<ProgressStats> {
        let items = self.store.list(user)?;
        Ok(stats::summarize(&items, &self.schedule, current_instant(now)))
    }
}
