//! Fixed in-process verse table.

use async_trait::async_trait;
use std::collections::HashMap;

use super::{Verse, VerseError, VerseRepository};
use crate::memorization::VerseKey;

#[derive(Debug, Default, Clone)]
pub struct InMemoryVerseRepository {
    verses: HashMap<VerseKey, Verse>,
}

impl InMemoryVerseRepository {
    pub fn new(verses: impl IntoIterator<Item = Verse>) -> Self {
        Self {
            verses: verses.into_iter().map(|v| (v.key(), v)).collect(),
        }
    }

    pub fn insert(&mut self, verse: Verse) {
        self.verses.insert(verse.key(), verse);
    }
}

#[async_trait]
impl VerseRepository for InMemoryVerseRepository {
    async fn get_verse(&self, key: VerseKey) -> Result<Verse, VerseError> {
        self.verses.get(&key).cloned().ok_or(VerseError::NotFound(key))
    }
}
