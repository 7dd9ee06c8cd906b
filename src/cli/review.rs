//! CLI `review` command — record one recall judgment.

use anyhow::Result;

use shloka::config::ShlokaConfig;

pub fn review(config: &ShlokaConfig, user: &str, chapter: i64, verse: i64, correct: bool) -> Result<()> {
    let user = super::parse_user(user)?;
    let key = super::parse_key(chapter, verse)?;
    let mut scheduler = super::open_scheduler(config)?;

    let item = scheduler.record_review(&user, key, correct)?;
    let verdict = if correct { "correct" } else { "incorrect" };
    println!(
        "{key} marked {verdict}: now in box {}, next review {}.",
        item.box_level,
        item.next_review_date.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}
