//! HTTP API for the scheduler.
//!
//! Provides [`router`] (the axum routes under `/memorization`) and [`serve`],
//! which wires the configured store, schedule, and verse repository into a
//! running server.

pub mod error;
pub mod handlers;
pub mod identity;

use anyhow::Result;
use axum::routing::{get, post};
use axum::{middleware, Router};
use std::sync::{Arc, Mutex};
use tower_http::cors::CorsLayer;

use crate::config::ShlokaConfig;
use crate::memorization::store::{self, ProgressStore};
use crate::memorization::{LeitnerSchedule, Scheduler};
use crate::verses::{self, VerseRepository};

pub type StoreScheduler = Scheduler<Box<dyn ProgressStore>>;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    /// One lock around the store serializes mutations, so writes to the same
    /// key never interleave.
    pub scheduler: Arc<Mutex<StoreScheduler>>,
    pub verses: Arc<dyn VerseRepository>,
}

impl AppState {
    pub fn new(scheduler: StoreScheduler, verses: Arc<dyn VerseRepository>) -> Self {
        Self {
            scheduler: Arc::new(Mutex::new(scheduler)),
            verses,
        }
    }

    /// Build state from config: store backend, schedule table, verse provider.
    pub fn from_config(config: &ShlokaConfig) -> Result<Self> {
        let store = store::create_store(config)?;
        let schedule = LeitnerSchedule::new(config.schedule.intervals_days.clone())?;
        let verses: Arc<dyn VerseRepository> =
            Arc::from(verses::create_repository(&config.verses)?);
        tracing::info!(
            backend = %config.storage.backend,
            max_box = schedule.max_box(),
            verse_provider = %config.verses.provider,
            "scheduler ready"
        );
        Ok(Self::new(Scheduler::new(store, schedule), verses))
    }
}

pub fn router(state: AppState) -> Router {
    let memorization = Router::new()
        .route("/", get(handlers::list_items))
        .route("/due", get(handlers::due_cards))
        .route("/stats", get(handlers::stats))
        .route("/start", post(handlers::start))
        .route("/progress", post(handlers::progress))
        .route("/remove", post(handlers::remove))
        .route("/{chapter}/{verse}", get(handlers::get_item))
        .route_layer(middleware::from_fn(identity::require_user));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/memorization", memorization)
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server and run until Ctrl-C.
pub async fn serve(config: ShlokaConfig) -> Result<()> {
    let bind_addr = config.bind_addr();
    let state = AppState::from_config(&config)?;

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening at http://{bind_addr}/memorization");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for ctrl-c");
            }
            tracing::info!("shutting down HTTP server");
        })
        .await?;

    Ok(())
}
