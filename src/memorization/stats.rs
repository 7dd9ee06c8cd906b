//! Per-user progress summary.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use super::schedule::LeitnerSchedule;
use super::types::MemorizationItem;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressStats {
    pub total_items: u64,
    pub due_now: u64,
    /// Items sitting in the last box of the schedule.
    pub mastered: u64,
    /// Item count per box; every box of the schedule is present.
    pub by_box: BTreeMap<u32, u64>,
    /// Earliest upcoming review among items not yet due.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_review_date: Option<DateTime<Utc>>,
}

/// Summarize a user's items as of `now`.
pub fn summarize(
    items: &[MemorizationItem],
    schedule: &LeitnerSchedule,
    now: DateTime<Utc>,
) -> ProgressStats {
    let mut by_box: BTreeMap<u32, u64> = (1..=schedule.max_box()).map(|b| (b, 0)).collect();
    let mut due_now = 0;
    let mut mastered = 0;
    let mut next_review_date: Option<DateTime<Utc>> = None;

    for item in items {
        *by_box.entry(item.box_level).or_insert(0) += 1;
        if schedule.is_mastered(item.box_level) {
            mastered += 1;
        }
        if item.is_due(now) {
            due_now += 1;
        } else {
            next_review_date = Some(match next_review_date {
                Some(current) => current.min(item.next_review_date),
                None => item.next_review_date,
            });
        }
    }

    ProgressStats {
        total_items: items.len() as u64,
        due_now,
        mastered,
        by_box,
        next_review_date,
    }
}
