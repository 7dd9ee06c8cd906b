//! Spaced-repetition memorization for Bhagavad Gita verses ("shloks").
//!
//! Shloka keeps a Leitner-style review state for every verse a user has chosen
//! to memorize, and answers two questions: which verses are due right now, and
//! how a review outcome moves a verse between boxes.
//!
//! | Box | Interval (default) |
//! |-----|--------------------|
//! | 1 | due immediately |
//! | 2 | 2 days |
//! | 3 | 4 days |
//! | n | 2^(n-1) days, up to box 8 (128 days) |
//!
//! A correct answer promotes a verse one box, an incorrect answer demotes it one
//! box (never below box 1). Due-ness is never stored: it is computed at query
//! time by comparing `nextReviewDate` with the current instant.
//!
//! # Architecture
//!
//! - **Storage**: SQLite via `rusqlite`, or an in-memory map for ephemeral runs
//! - **Verse content**: fetched from the remote shlok API and joined into due cards
//! - **Transport**: JSON over HTTP (axum) under `/memorization`, plus a local CLI
//!
//! # Modules
//!
//! - [`config`] — Configuration loading from TOML files and environment variables
//! - [`db`] — SQLite database initialization, schema, migrations, and health checks
//! - [`memorization`] — Scheduler core: item model, Leitner schedule, stores, stats
//! - [`verses`] — Verse repository client and canonical chapter/verse counts
//! - [`server`] — HTTP API exposing the scheduler

pub mod config;
pub mod db;
pub mod memorization;
pub mod server;
pub mod verses;
