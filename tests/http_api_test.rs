use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use shloka::memorization::store::sqlite::SqliteStore;
use shloka::memorization::{LeitnerSchedule, ProgressStore, Scheduler};
use shloka::server::{router, AppState};
use shloka::memorization::VerseKey;
use shloka::verses::memory::InMemoryVerseRepository;
use shloka::verses::{Verse, VerseError, VerseRepository};

fn gita_2_47() -> Verse {
    Verse {
        chapter_number: 2,
        verse_number: 47,
        sanskrit_text: "कर्मण्येवाधिकारस्ते मा फलेषु कदाचन".into(),
        transliteration: "karmaṇy evādhikāras te mā phaleṣu kadācana".into(),
        translation_english: "You have a right to your actions alone, never to their fruits.".into(),
        translation_hindi: String::new(),
        tags: vec!["karma".into()],
        audio_url: None,
    }
}

fn app() -> Router {
    app_with_verses(Arc::new(InMemoryVerseRepository::new([gita_2_47()])))
}

fn app_with_verses(verses: Arc<dyn VerseRepository>) -> Router {
    let store: Box<dyn ProgressStore> = Box::new(SqliteStore::open_in_memory().unwrap());
    let scheduler = Scheduler::new(store, LeitnerSchedule::default());
    router(AppState::new(scheduler, verses))
}

/// Answers only once `n` lookups are in flight at the same time.
struct RendezvousVerses {
    barrier: tokio::sync::Barrier,
}

#[async_trait::async_trait]
impl VerseRepository for RendezvousVerses {
    async fn get_verse(&self, key: VerseKey) -> Result<Verse, VerseError> {
        self.barrier.wait().await;
        Ok(Verse {
            chapter_number: key.chapter_number,
            verse_number: key.verse_number,
            translation_english: format!("verse {key}"),
            ..gita_2_47()
        })
    }
}

fn request(method: &str, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header("x-user-id", user);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

#[tokio::test]
async fn health_needs_no_identity() {
    let app = app();
    let response = app.oneshot(request("GET", "/health", None, None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let app = app();
    let (status, body) = send(&app, request("GET", "/memorization/due", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["message"].as_str().unwrap().contains("x-user-id"));
}

#[tokio::test]
async fn start_then_due_joins_verse_content() {
    let app = app();
    let start = json!({ "chapterNumber": 2, "verseNumber": 47 });

    let (status, item) = send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(start))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["box"], 1);
    assert_eq!(item["chapterNumber"], 2);
    assert_eq!(item["verseNumber"], 47);
    assert_eq!(item["userId"], "arjuna");

    let (status, due) = send(&app, request("GET", "/memorization/due", Some("arjuna"), None)).await;
    assert_eq!(status, StatusCode::OK);
    let cards = due.as_array().unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0]["verse"]["transliteration"], gita_2_47().transliteration);
}

#[tokio::test]
async fn due_card_without_known_verse_has_null_verse() {
    let app = app();
    let start = json!({ "chapterNumber": 3, "verseNumber": 10 });
    send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(start))).await;

    let (status, due) = send(&app, request("GET", "/memorization/due", Some("arjuna"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(due[0]["chapterNumber"], 3);
    assert!(due[0]["verse"].is_null());
}

#[tokio::test]
async fn progress_promotes_and_clears_due_list() {
    let app = app();
    let start = json!({ "chapterNumber": 2, "verseNumber": 47 });
    send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(start))).await;

    let review = json!({ "chapterNumber": 2, "verseNumber": 47, "isCorrect": true });
    let (status, body) = send(&app, request("POST", "/memorization/progress", Some("arjuna"), Some(review))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Progress updated");
    assert_eq!(body["progress"]["box"], 2);
    assert_eq!(body["progress"]["reviewCount"], 1);

    let (_, due) = send(&app, request("GET", "/memorization/due", Some("arjuna"), None)).await;
    assert!(due.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn progress_for_untracked_verse_is_not_found() {
    let app = app();
    let review = json!({ "chapterNumber": 3, "verseNumber": 10, "isCorrect": true });

    let (status, body) = send(&app, request("POST", "/memorization/progress", Some("arjuna"), Some(review))).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["message"].as_str().unwrap().contains("3.10"));
}

#[tokio::test]
async fn invalid_verse_is_bad_request() {
    let app = app();
    for payload in [
        json!({ "chapterNumber": 19, "verseNumber": 1 }),
        json!({ "chapterNumber": 2, "verseNumber": 73 }),
        json!({ "chapterNumber": 0, "verseNumber": 1 }),
    ] {
        let (status, _) = send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(payload))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn remove_is_idempotent_over_http() {
    let app = app();
    let target = json!({ "chapterNumber": 2, "verseNumber": 47 });
    send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(target.clone()))).await;

    let (status, first) = send(&app, request("POST", "/memorization/remove", Some("arjuna"), Some(target.clone()))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["removed"], true);

    let (status, second) = send(&app, request("POST", "/memorization/remove", Some("arjuna"), Some(target))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["removed"], false);

    let (_, due) = send(&app, request("GET", "/memorization/due", Some("arjuna"), None)).await;
    assert!(due.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn users_are_isolated_over_http() {
    let app = app();
    let start = json!({ "chapterNumber": 2, "verseNumber": 47 });
    send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(start))).await;

    let (_, due) = send(&app, request("GET", "/memorization/due", Some("bhima"), None)).await;
    assert!(due.as_array().unwrap().is_empty());

    let (status, _) = send(&app, request("GET", "/memorization/2/47", Some("bhima"), None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, item) = send(&app, request("GET", "/memorization/2/47", Some("arjuna"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(item["box"], 1);
}

#[tokio::test]
async fn list_and_stats_summarize_progress() {
    let app = app();
    for (chapter, verse) in [(2, 47), (12, 13)] {
        let body = json!({ "chapterNumber": chapter, "verseNumber": verse });
        send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(body))).await;
    }
    let review = json!({ "chapterNumber": 12, "verseNumber": 13, "isCorrect": true });
    send(&app, request("POST", "/memorization/progress", Some("arjuna"), Some(review))).await;

    let (status, list) = send(&app, request("GET", "/memorization", Some("arjuna"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);

    let (status, stats) = send(&app, request("GET", "/memorization/stats", Some("arjuna"), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalItems"], 2);
    assert_eq!(stats["dueNow"], 1);
    assert_eq!(stats["byBox"]["2"], 1);
}

#[tokio::test]
async fn malformed_bodies_are_bad_request_with_json_message() {
    let app = app();
    let start = json!({ "chapterNumber": 2, "verseNumber": 47 });
    send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(start))).await;

    for (uri, payload) in [
        ("/memorization/progress", json!({ "chapterNumber": "two", "verseNumber": 47, "isCorrect": true })),
        ("/memorization/progress", json!({ "chapterNumber": 2, "verseNumber": 47, "isCorrect": "yes" })),
        ("/memorization/start", json!({ "chapterNumber": 2 })),
        ("/memorization/remove", json!({ "chapterNumber": 2.5, "verseNumber": 47 })),
    ] {
        let (status, body) = send(&app, request("POST", uri, Some("arjuna"), Some(payload.clone()))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri} {payload}");
        assert!(body["message"].is_string(), "{uri} {payload}: {body}");
    }

    // nothing was reviewed or removed by the rejected requests
    let (_, item) = send(&app, request("GET", "/memorization/2/47", Some("arjuna"), None)).await;
    assert_eq!(item["box"], 1);
}

#[tokio::test]
async fn malformed_path_is_bad_request_with_json_message() {
    let app = app();

    let (status, body) = send(&app, request("GET", "/memorization/abc/1", Some("arjuna"), None)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("invalid input"));
}

#[tokio::test]
async fn due_cards_fetch_verses_concurrently_in_queue_order() {
    let keys = [(1, 1), (2, 47), (3, 10), (12, 13)];
    let app = app_with_verses(Arc::new(RendezvousVerses {
        barrier: tokio::sync::Barrier::new(keys.len()),
    }));
    for (chapter, verse) in keys {
        let body = json!({ "chapterNumber": chapter, "verseNumber": verse });
        send(&app, request("POST", "/memorization/start", Some("arjuna"), Some(body))).await;
    }

    // one-at-a-time lookups would never get past the barrier
    let (status, due) = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        send(&app, request("GET", "/memorization/due", Some("arjuna"), None)),
    )
    .await
    .expect("verse lookups did not overlap");

    assert_eq!(status, StatusCode::OK);
    let translations: Vec<&str> = due
        .as_array()
        .unwrap()
        .iter()
        .map(|card| card["verse"]["translationEnglish"].as_str().unwrap())
        .collect();
    assert_eq!(translations, vec!["verse 1.1", "verse 2.47", "verse 3.10", "verse 12.13"]);
}
