mod cli;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shloka::config::ShlokaConfig;

#[derive(Parser)]
#[command(name = "shloka", version, about = "Leitner-box memorization scheduler for Bhagavad Gita verses")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct VerseArgs {
    /// User whose progress to act on
    #[arg(long)]
    user: String,
    /// Chapter number (1-18)
    #[arg(short, long)]
    chapter: i64,
    /// Verse number within the chapter
    #[arg(short, long)]
    verse: i64,
}

#[derive(Subcommand)]
enum Command {
    /// Start the HTTP API server
    Serve,
    /// List verses due for review now
    Due {
        #[arg(long)]
        user: String,
    },
    /// List every verse a user is memorizing
    List {
        #[arg(long)]
        user: String,
    },
    /// Begin memorizing a verse
    Start(VerseArgs),
    /// Record a review result for a verse
    Review {
        #[command(flatten)]
        target: VerseArgs,
        /// The verse was recalled correctly
        #[arg(long, conflicts_with = "incorrect", required_unless_present = "incorrect")]
        correct: bool,
        /// The verse was not recalled
        #[arg(long)]
        incorrect: bool,
    },
    /// Stop memorizing a verse
    Remove(VerseArgs),
    /// Show memorization statistics
    Stats {
        #[arg(long)]
        user: String,
    },
    /// Export memorization items as JSON to stdout
    Export {
        /// Only export this user's items
        #[arg(long)]
        user: Option<String>,
    },
    /// Run database diagnostics
    Doctor,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load config (for log level)
    let config = ShlokaConfig::load()?;

    // Log to stderr so stdout stays clean for command output.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve => {
            shloka::server::serve(config).await?;
        }
        Command::Due { user } => {
            cli::due::due(&config, &user)?;
        }
        Command::List { user } => {
            cli::list::list(&config, &user)?;
        }
        Command::Start(args) => {
            cli::track::start(&config, &args.user, args.chapter, args.verse)?;
        }
        Command::Review { target, correct, .. } => {
            cli::review::review(&config, &target.user, target.chapter, target.verse, correct)?;
        }
        Command::Remove(args) => {
            cli::track::remove(&config, &args.user, args.chapter, args.verse)?;
        }
        Command::Stats { user } => {
            cli::stats::stats(&config, &user)?;
        }
        Command::Export { user } => {
            cli::export::export(&config, user.as_deref())?;
        }
        Command::Doctor => {
            cli::doctor::doctor(&config)?;
        }
    }

    Ok(())
}
