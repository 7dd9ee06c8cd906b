//! Verse content lookup.
//!
//! The scheduler only stores chapter/verse keys; rendering a review card needs
//! the verse itself. [`VerseRepository`] is that collaborator, created via
//! [`create_repository`] from configuration.

pub mod canon;
pub mod http;
pub mod memory;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::memorization::VerseKey;

/// A verse record as served by the shlok API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verse {
    pub chapter_number: u32,
    pub verse_number: u32,
    #[serde(default)]
    pub sanskrit_text: String,
    #[serde(default)]
    pub transliteration: String,
    #[serde(default)]
    pub translation_english: String,
    #[serde(default)]
    pub translation_hindi: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

impl Verse {
    pub fn key(&self) -> VerseKey {
        VerseKey {
            chapter_number: self.chapter_number,
            verse_number: self.verse_number,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum VerseError {
    #[error("verse {0} not found")]
    NotFound(VerseKey),

    #[error("verse service error: {0}")]
    Upstream(String),
}

/// Fetches verse content by chapter/verse key.
#[async_trait]
pub trait VerseRepository: Send + Sync {
    async fn get_verse(&self, key: VerseKey) -> Result<Verse, VerseError>;
}

/// Create a verse repository from config.
///
/// `"http"` talks to the shlok API at `verses.base_url`; `"none"` knows no
/// verses, so due cards carry keys only.
pub fn create_repository(
    config: &crate::config::VersesConfig,
) -> Result<Box<dyn VerseRepository>> {
    match config.provider.as_str() {
        "http" => Ok(Box::new(http::HttpVerseRepository::new(config)?)),
        "none" => Ok(Box::new(memory::InMemoryVerseRepository::default())),
        other => anyhow::bail!("unknown verse provider: {other}. Supported: http, none"),
    }
}
