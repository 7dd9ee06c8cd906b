use anyhow::Result;
use serde::Serialize;

use shloka::config::ShlokaConfig;
use shloka::memorization::{MemorizationItem, ProgressStore};

/// Export format — wraps all memorization items.
#[derive(Debug, Serialize)]
struct ExportData {
    items: Vec<MemorizationItem>,
}

/// Export memorization items as JSON to stdout, optionally for one user.
pub fn export(config: &ShlokaConfig, user: Option<&str>) -> Result<()> {
    let scheduler = super::open_scheduler(config)?;

    let items = match user {
        Some(raw) => scheduler.list_items(&super::parse_user(raw)?)?,
        None => scheduler.store().list_all()?,
    };

    let data = ExportData { items };
    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!("Exported {} items.", data.items.len());
    Ok(())
}
