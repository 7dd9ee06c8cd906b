//! Verse lookup against the remote shlok API (`GET {base_url}/shloks/{chapter}/{verse}`).

use async_trait::async_trait;
use std::time::Duration;

use super::{Verse, VerseError, VerseRepository};
use crate::config::VersesConfig;
use crate::memorization::VerseKey;

pub struct HttpVerseRepository {
    client: reqwest::Client,
    base_url: String,
}

impl HttpVerseRepository {
    pub fn new(config: &VersesConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn verse_url(&self, key: VerseKey) -> String {
        format!(
            "{}/shloks/{}/{}",
            self.base_url, key.chapter_number, key.verse_number
        )
    }
}

/// The API wraps payloads as `{ "data": ... }` on some routes and not others.
pub fn unwrap_envelope(body: serde_json::Value) -> serde_json::Value {
    match body {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or(serde_json::Value::Null)
        }
        other => other,
    }
}

#[async_trait]
impl VerseRepository for HttpVerseRepository {
    async fn get_verse(&self, key: VerseKey) -> Result<Verse, VerseError> {
        let url = self.verse_url(key);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| VerseError::Upstream(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(VerseError::NotFound(key));
        }
        if !status.is_success() {
            return Err(VerseError::Upstream(format!("{url} returned HTTP {status}")));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VerseError::Upstream(format!("invalid JSON from {url}: {e}")))?;

        let verse: Verse = serde_json::from_value(unwrap_envelope(body))
            .map_err(|e| VerseError::Upstream(format!("unexpected verse shape from {url}: {e}")))?;
        tracing::debug!(verse = %key, "verse fetched");
        Ok(verse)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verse_url_strips_trailing_slash() {
        let config = VersesConfig {
            base_url: "http://localhost:4000/api/v1/".into(),
            ..VersesConfig::default()
        };
        let repo = HttpVerseRepository::new(&config).unwrap();
        assert_eq!(
            repo.verse_url(VerseKey::new(2, 47).unwrap()),
            "http://localhost:4000/api/v1/shloks/2/47"
        );
    }

    #[test]
    fn unwrap_envelope_handles_both_shapes() {
        let wrapped = serde_json::json!({ "data": { "chapterNumber": 1 } });
        assert_eq!(unwrap_envelope(wrapped)["chapterNumber"], 1);

        let bare = serde_json::json!({ "chapterNumber": 3 });
        assert_eq!(unwrap_envelope(bare)["chapterNumber"], 3);
    }
}
