//! Core memorization type definitions.
//!
//! Defines [`UserId`] (the identity progress is scoped to), [`VerseKey`]
//! (a chapter/verse reference), [`MemorizationItem`] (one tracked verse),
//! [`ReviewOutcome`] (a single review judgment), and [`DueCard`] (a due item
//! joined with its verse content).

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};

use super::error::{MemorizationError, Result};
use crate::verses::{canon, Verse};

/// Opaque identity supplied by the session provider.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub const MAX_LEN: usize = 128;

    /// Trims surrounding whitespace; blank or overlong ids are rejected.
    pub fn new(raw: impl AsRef<str>) -> Result<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(MemorizationError::Validation(
                "user id must not be empty".into(),
            ));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(MemorizationError::Validation(format!(
                "user id must be at most {} bytes",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for UserId {
    type Err = MemorizationError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

/// A chapter/verse reference into the Gita. Orders by chapter, then verse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerseKey {
    pub chapter_number: u32,
    pub verse_number: u32,
}

impl VerseKey {
    /// Validate raw numbers against the canonical chapter and verse counts.
    pub fn new(chapter: i64, verse: i64) -> Result<Self> {
        if chapter < 1 || verse < 1 {
            return Err(MemorizationError::Validation(format!(
                "chapter and verse must be positive integers, got {chapter}.{verse}"
            )));
        }
        let chapter_number = u32::try_from(chapter).ok().filter(|c| *c <= canon::CHAPTER_COUNT);
        let Some(chapter_number) = chapter_number else {
            return Err(MemorizationError::Validation(format!(
                "chapter {chapter} is out of range (1-{})",
                canon::CHAPTER_COUNT
            )));
        };
        let max_verse = canon::verse_count(chapter_number).unwrap_or(0);
        let verse_number = u32::try_from(verse).ok().filter(|v| *v <= max_verse);
        let Some(verse_number) = verse_number else {
            return Err(MemorizationError::Validation(format!(
                "verse {verse} is out of range for chapter {chapter_number} (1-{max_verse})"
            )));
        };
        Ok(Self {
            chapter_number,
            verse_number,
        })
    }
}

impl std::fmt::Display for VerseKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.chapter_number, self.verse_number)
    }
}

impl std::str::FromStr for VerseKey {
    type Err = MemorizationError;

    /// Parses `"2.47"` or `"2-47"`.
    fn from_str(s: &str) -> Result<Self> {
        let (chapter, verse) = s
            .split_once(['.', '-'])
            .ok_or_else(|| MemorizationError::Validation(format!("malformed verse key: {s}")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<i64>()
                .map_err(|_| MemorizationError::Validation(format!("malformed verse key: {s}")))
        };
        Self::new(parse(chapter)?, parse(verse)?)
    }
}

/// One verse a user is memorizing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorizationItem {
    /// UUID v7 (time-sortable) record id.
    pub id: String,
    pub user_id: UserId,
    #[serde(flatten)]
    pub key: VerseKey,
    /// Leitner box, always `>= 1`.
    #[serde(rename = "box")]
    pub box_level: u32,
    pub next_review_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub review_count: u32,
    pub last_reviewed_at: Option<DateTime<Utc>>,
}

impl MemorizationItem {
    /// A fresh item in box 1, due immediately.
    pub fn new(user_id: UserId, key: VerseKey, now: DateTime<Utc>) -> Self {
        let now = now.trunc_subsecs(6);
        Self {
            id: uuid::Uuid::now_v7().to_string(),
            user_id,
            key,
            box_level: 1,
            next_review_date: now,
            created_at: now,
            review_count: 0,
            last_reviewed_at: None,
        }
    }

    /// Due-ness is derived, never stored.
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_date <= now
    }
}

/// The result of a single review, applied exactly once per learner interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub user_id: UserId,
    pub key: VerseKey,
    pub is_correct: bool,
}

/// A due item with its verse content joined in for rendering.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DueCard {
    #[serde(flatten)]
    pub item: MemorizationItem,
    /// `None` when the verse repository could not supply the text.
    pub verse: Option<Verse>,
}
