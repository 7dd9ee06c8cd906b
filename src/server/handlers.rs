//! Handlers for the `/memorization` routes.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::{Extension, Json};
use futures::future::join_all;
use serde::{Deserialize, Serialize};

use super::error::ApiError;
use super::{AppState, StoreScheduler};
use crate::memorization::stats::ProgressStats;
use crate::memorization::{DueCard, MemorizationError, MemorizationItem, UserId, VerseKey};

/// `{ chapterNumber, verseNumber }` — start and remove requests.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersePayload {
    pub chapter_number: i64,
    pub verse_number: i64,
}

/// `{ chapterNumber, verseNumber, isCorrect }` — progress updates.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressPayload {
    pub chapter_number: i64,
    pub verse_number: i64,
    pub is_correct: bool,
}

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub message: String,
    pub progress: MemorizationItem,
}

#[derive(Debug, Serialize)]
pub struct RemoveResponse {
    pub message: String,
    pub removed: bool,
}

/// Run a scheduler call on the blocking pool while holding the store lock.
async fn with_scheduler<T, F>(state: &AppState, f: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&mut StoreScheduler) -> Result<T, MemorizationError> + Send + 'static,
{
    let scheduler = state.scheduler.clone();
    tokio::task::spawn_blocking(move || {
        let mut guard = scheduler.lock().map_err(|e| {
            MemorizationError::StorageUnavailable(format!("store lock poisoned: {e}"))
        })?;
        f(&mut *guard)
    })
    .await
    .map_err(|e| ApiError::Internal(format!("store task failed: {e}")))?
    .map_err(ApiError::from)
}

pub async fn due_cards(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Result<Json<Vec<DueCard>>, ApiError> {
    let items = with_scheduler(&state, move |s| s.due_items(&user))
        .await
        .map_err(ApiError::review_queue)?;

    let verses = state.verses.as_ref();
    let cards = join_all(items.into_iter().map(|item| async move {
        let verse = match verses.get_verse(item.key).await {
            Ok(verse) => Some(verse),
            Err(e) => {
                tracing::warn!(verse = %item.key, error = %e, "verse content unavailable");
                None
            }
        };
        DueCard { item, verse }
    }))
    .await;

    Ok(Json(cards))
}

pub async fn list_items(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Result<Json<Vec<MemorizationItem>>, ApiError> {
    let items = with_scheduler(&state, move |s| s.list_items(&user)).await?;
    Ok(Json(items))
}

pub async fn get_item(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    path: Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<MemorizationItem>, ApiError> {
    let Path((chapter, verse)) = path?;
    let key = VerseKey::new(chapter, verse)?;
    let lookup_user = user.clone();
    let item = with_scheduler(&state, move |s| s.get_item(&lookup_user, key)).await?;

    item.map(Json).ok_or_else(|| {
        ApiError::from(MemorizationError::ItemNotFound {
            user: user.to_string(),
            chapter: key.chapter_number,
            verse: key.verse_number,
        })
    })
}

pub async fn stats(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
) -> Result<Json<ProgressStats>, ApiError> {
    let stats = with_scheduler(&state, move |s| s.stats(&user)).await?;
    Ok(Json(stats))
}

pub async fn start(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    payload: Result<Json<VersePayload>, JsonRejection>,
) -> Result<Json<MemorizationItem>, ApiError> {
    let Json(payload) = payload?;
    let key = VerseKey::new(payload.chapter_number, payload.verse_number)?;
    let item = with_scheduler(&state, move |s| s.start_memorization(&user, key)).await?;
    Ok(Json(item))
}

pub async fn progress(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    payload: Result<Json<ProgressPayload>, JsonRejection>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let Json(payload) = payload?;
    let key = VerseKey::new(payload.chapter_number, payload.verse_number)?;
    let is_correct = payload.is_correct;
    let item = with_scheduler(&state, move |s| s.record_review(&user, key, is_correct)).await?;

    Ok(Json(ProgressResponse {
        message: "Progress updated".into(),
        progress: item,
    }))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<UserId>,
    payload: Result<Json<VersePayload>, JsonRejection>,
) -> Result<Json<RemoveResponse>, ApiError> {
    let Json(payload) = payload?;
    let key = VerseKey::new(payload.chapter_number, payload.verse_number)?;
    let removed = with_scheduler(&state, move |s| s.remove_memorization(&user, key)).await?;

    let message = if removed {
        format!("Stopped memorizing {key}")
    } else {
        format!("{key} was not being memorized")
    };
    Ok(Json(RemoveResponse { message, removed }))
}
