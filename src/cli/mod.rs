pub mod doctor;
pub mod due;
pub mod export;
pub mod list;
pub mod review;
pub mod stats;
pub mod track;

use anyhow::{Context, Result};

use shloka::config::ShlokaConfig;
use shloka::memorization::store;
use shloka::memorization::{LeitnerSchedule, Scheduler, UserId, VerseKey};
use shloka::server::StoreScheduler;

/// Open the configured store with the configured schedule.
pub fn open_scheduler(config: &ShlokaConfig) -> Result<StoreScheduler> {
    if config.storage.backend == "memory" {
        tracing::warn!("memory backend selected; CLI changes are discarded on exit");
    }
    let store = store::create_store(config)?;
    let schedule = LeitnerSchedule::new(config.schedule.intervals_days.clone())
        .context("invalid [schedule] intervals_days")?;
    Ok(Scheduler::new(store, schedule))
}

pub fn parse_user(raw: &str) -> Result<UserId> {
    UserId::new(raw).context("invalid --user")
}

pub fn parse_key(chapter: i64, verse: i64) -> Result<VerseKey> {
    VerseKey::new(chapter, verse).context("invalid verse")
}
