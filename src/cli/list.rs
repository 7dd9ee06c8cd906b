use anyhow::Result;

use shloka::config::ShlokaConfig;

/// Print every verse a user is memorizing with its box and next review.
pub fn list(config: &ShlokaConfig, user: &str) -> Result<()> {
    let user = super::parse_user(user)?;
    let scheduler = super::open_scheduler(config)?;

    let items = scheduler.list_items(&user)?;
    if items.is_empty() {
        println!("{user} is not memorizing any verses yet.");
        return Ok(());
    }

    println!("{:<8} {:<5} {:<8} {}", "Verse", "Box", "Reviews", "Next review");
    println!("{}", "-".repeat(60));
    for item in &items {
        let marker = if scheduler.schedule().is_mastered(item.box_level) {
            " (mastered)"
        } else {
            ""
        };
        println!(
            "{:<8} {:<5} {:<8} {}{marker}",
            item.key.to_string(),
            item.box_level,
            item.review_count,
            item.next_review_date.format("%Y-%m-%d %H:%M UTC"),
        );
    }

    Ok(())
}
