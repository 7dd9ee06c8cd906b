//! CLI `due` command — list the verses a user should review now.

use anyhow::Result;
use chrono::Utc;

use shloka::config::ShlokaConfig;

pub fn due(config: &ShlokaConfig, user: &str) -> Result<()> {
    let user = super::parse_user(user)?;
    let scheduler = super::open_scheduler(config)?;

    let items = scheduler.due_items(&user)?;
    if items.is_empty() {
        println!("Nothing due for {user}. You're all caught up!");
        return Ok(());
    }

    let now = Utc::now();
    println!("{} verse(s) due for {user}:\n", items.len());
    println!("{:<8} {:<5} {}", "Verse", "Box", "Overdue by");
    println!("{}", "-".repeat(40));
    for item in &items {
        let overdue = now - item.next_review_date;
        println!(
            "{:<8} {:<5} {}h {}m",
            item.key.to_string(),
            item.box_level,
            overdue.num_hours(),
            overdue.num_minutes() % 60
        );
    }

    Ok(())
}
