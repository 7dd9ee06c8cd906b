use anyhow::Result;

use shloka::config::ShlokaConfig;

/// Display a user's memorization statistics in the terminal.
pub fn stats(config: &ShlokaConfig, user: &str) -> Result<()> {
    let user = super::parse_user(user)?;
    let scheduler = super::open_scheduler(config)?;

    let response = scheduler.stats(&user)?;

    println!("Memorization Statistics for {user}");
    println!("{}", "=".repeat(40));
    println!("  Total verses:        {}", response.total_items);
    println!("  Due now:             {}", response.due_now);
    println!("  Mastered:            {}", response.mastered);
    println!();

    println!("By Box:");
    for (box_level, count) in &response.by_box {
        println!("  box {:<8} {}", box_level, count);
    }

    if let Some(next) = response.next_review_date {
        println!();
        println!("Next review:           {}", next.format("%Y-%m-%d %H:%M UTC"));
    }

    Ok(())
}
