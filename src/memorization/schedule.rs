//! Leitner box schedule.
//!
//! Each box `n` maps to a fixed review interval. The table must be strictly
//! increasing, so a higher box never yields a shorter or equal interval than a
//! lower one. The number of entries is the maximum box; an item sitting in the
//! last box is "mastered" and keeps being rescheduled at the longest interval.

use chrono::{DateTime, Duration, Utc};

use super::error::{MemorizationError, Result};
use super::types::MemorizationItem;

/// Box 1 is due immediately, then doubling from two days up to box 8.
pub const DEFAULT_INTERVALS_DAYS: [u32; 8] = [0, 2, 4, 8, 16, 32, 64, 128];

/// Upper bound on any single interval, so `now + interval` cannot overflow.
pub const MAX_INTERVAL_DAYS: u32 = 36_500;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeitnerSchedule {
    intervals_days: Vec<u32>,
}

impl Default for LeitnerSchedule {
    fn default() -> Self {
        Self {
            intervals_days: DEFAULT_INTERVALS_DAYS.to_vec(),
        }
    }
}

impl LeitnerSchedule {
    pub fn new(intervals_days: Vec<u32>) -> Result<Self> {
        if intervals_days.is_empty() {
            return Err(MemorizationError::Validation(
                "schedule needs at least one box".into(),
            ));
        }
        if intervals_days.windows(2).any(|pair| pair[1] <= pair[0]) {
            return Err(MemorizationError::Validation(format!(
                "schedule intervals must be strictly increasing, got {intervals_days:?}"
            )));
        }
        if intervals_days.iter().any(|days| *days > MAX_INTERVAL_DAYS) {
            return Err(MemorizationError::Validation(format!(
                "schedule intervals must not exceed {MAX_INTERVAL_DAYS} days"
            )));
        }
        Ok(Self { intervals_days })
    }

    pub fn max_box(&self) -> u32 {
        self.intervals_days.len() as u32
    }

    /// Review interval for a box. Boxes outside `1..=max_box` are clamped.
    pub fn interval(&self, box_level: u32) -> Duration {
        let index = box_level.clamp(1, self.max_box()) as usize - 1;
        Duration::days(i64::from(self.intervals_days[index]))
    }

    pub fn is_mastered(&self, box_level: u32) -> bool {
        box_level >= self.max_box()
    }

    /// Box after a review: up one on correct (stopping at the last box), down
    /// one on incorrect (never below box 1).
    pub fn next_box(&self, box_level: u32, is_correct: bool) -> u32 {
        let next = if is_correct {
            box_level.saturating_add(1)
        } else {
            box_level.saturating_sub(1)
        };
        next.clamp(1, self.max_box())
    }

    /// When an item landing in `box_level` at `now` is due next.
    pub fn next_review_date(&self, box_level: u32, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
        now.checked_add_signed(self.interval(box_level)).ok_or_else(|| {
            MemorizationError::Validation(format!(
                "review time {now} is too far in the future to schedule box {box_level}"
            ))
        })
    }

    /// Apply a review outcome in place. `created_at` is never touched, and
    /// nothing changes if the next review date cannot be represented.
    pub fn apply(&self, item: &mut MemorizationItem, is_correct: bool, now: DateTime<Utc>) -> Result<()> {
        let next = self.next_box(item.box_level, is_correct);
        let due = self.next_review_date(next, now)?;
        item.box_level = next;
        item.next_review_date = due;
        item.review_count = item.review_count.saturating_add(1);
        item.last_reviewed_at = Some(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memorization::types::{UserId, VerseKey};

    fn item_in_box(box_level: u32, now: DateTime<Utc>) -> MemorizationItem {
        let mut item = MemorizationItem::new(
            UserId::new("u").unwrap(),
            VerseKey::new(2, 47).unwrap(),
            now,
        );
        item.box_level = box_level;
        item
    }

    #[test]
    fn default_intervals_are_strictly_increasing() {
        let schedule = LeitnerSchedule::default();
        for b in 1..schedule.max_box() {
            assert!(schedule.interval(b + 1) > schedule.interval(b), "box {b}");
        }
        assert_eq!(schedule.interval(1), Duration::zero());
        assert_eq!(schedule.interval(2), Duration::days(2));
        assert_eq!(schedule.interval(3), Duration::days(4));
        assert_eq!(schedule.max_box(), 8);
    }

    #[test]
    fn rejects_empty_or_non_increasing_tables() {
        assert!(LeitnerSchedule::new(vec![]).is_err());
        assert!(LeitnerSchedule::new(vec![1, 1, 2]).is_err());
        assert!(LeitnerSchedule::new(vec![4, 2]).is_err());
        assert!(LeitnerSchedule::new(vec![0, MAX_INTERVAL_DAYS + 1]).is_err());
        assert!(LeitnerSchedule::new(vec![0, 1, 3]).is_ok());
    }

    #[test]
    fn correct_promotes_one_box() {
        let schedule = LeitnerSchedule::default();
        assert_eq!(schedule.next_box(1, true), 2);
        assert_eq!(schedule.next_box(5, true), 6);
    }

    #[test]
    fn incorrect_demotes_with_floor() {
        let schedule = LeitnerSchedule::default();
        assert_eq!(schedule.next_box(1, false), 1);
        assert_eq!(schedule.next_box(2, false), 1);
        assert_eq!(schedule.next_box(6, false), 5);
    }

    #[test]
    fn mastered_box_stays_at_cap() {
        let schedule = LeitnerSchedule::default();
        assert!(schedule.is_mastered(8));
        assert!(!schedule.is_mastered(7));
        assert_eq!(schedule.next_box(8, true), 8);
        // a box beyond a shrunken table is pulled back into range
        assert_eq!(schedule.next_box(12, false), 8);
    }

    #[test]
    fn apply_reschedules_from_now() {
        let schedule = LeitnerSchedule::default();
        let now = Utc::now();
        let mut item = item_in_box(1, now - Duration::days(3));
        let created = item.created_at;

        schedule.apply(&mut item, true, now).unwrap();

        assert_eq!(item.box_level, 2);
        assert_eq!(item.next_review_date, now + Duration::days(2));
        assert_eq!(item.review_count, 1);
        assert_eq!(item.last_reviewed_at, Some(now));
        assert_eq!(item.created_at, created);
    }

    #[test]
    fn incorrect_at_floor_is_due_again_immediately() {
        let schedule = LeitnerSchedule::default();
        let now = Utc::now();
        let mut item = item_in_box(1, now);

        schedule.apply(&mut item, false, now).unwrap();

        assert_eq!(item.box_level, 1);
        assert!(item.is_due(now));
    }

    #[test]
    fn apply_rejects_unrepresentable_due_date() {
        let schedule = LeitnerSchedule::default();
        let mut item = item_in_box(3, Utc::now());
        let before = item.clone();

        let err = schedule.apply(&mut item, true, DateTime::<Utc>::MAX_UTC).unwrap_err();

        assert!(matches!(err, MemorizationError::Validation(_)));
        assert_eq!(item, before);
    }
}
