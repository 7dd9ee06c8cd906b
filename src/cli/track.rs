//! CLI `start` and `remove` commands.

use anyhow::Result;

use shloka::config::ShlokaConfig;

pub fn start(config: &ShlokaConfig, user: &str, chapter: i64, verse: i64) -> Result<()> {
    let user = super::parse_user(user)?;
    let key = super::parse_key(chapter, verse)?;
    let mut scheduler = super::open_scheduler(config)?;

    let (item, created) = scheduler.ensure_memorizing(&user, key)?;
    if created {
        println!("Memorizing {key} (box 1, due now).");
    } else {
        println!(
            "Already memorizing {key} (box {}, next review {}).",
            item.box_level,
            item.next_review_date.format("%Y-%m-%d")
        );
    }
    Ok(())
}

pub fn remove(config: &ShlokaConfig, user: &str, chapter: i64, verse: i64) -> Result<()> {
    let user = super::parse_user(user)?;
    let key = super::parse_key(chapter, verse)?;
    let mut scheduler = super::open_scheduler(config)?;

    if scheduler.remove_memorization(&user, key)? {
        println!("Stopped memorizing {key}.");
    } else {
        println!("{key} was not being memorized.");
    }
    Ok(())
}
