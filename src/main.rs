use anyhow::Result;
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::Path;

use driftwood::config::Config;

/// Driftwood: timeline crawler for a fixed set of social accounts.
///
/// Fetches each followed account's recent posts, normalizes their text
/// (tokenize, stopword-filter, stem), and stores flat records in SQLite,
/// keyed on post id so re-running is idempotent.
#[derive(Parser)]
#[command(name = "driftwood", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Run one crawl: fetch, normalize, and store all followed accounts
    Crawl {
        /// Override the per-account fetch limit from the environment
        #[arg(long)]
        limit: Option<u32>,

        /// Isolate per-account fetch failures instead of aborting the run
        #[arg(long)]
        keep_going: bool,
    },

    /// Run the text normalization pipeline on an argument and print the result
    Normalize {
        /// The text to normalize
        text: String,
    },

    /// Show system status (stored posts, last crawl, DB stats)
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("driftwood=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init => {
            let config = Config::load()?;
            let store = driftwood::db::initialize(&config.db_path)?;
            let table_count = store.table_count().await?;
            println!("Database initialized at: {}", config.db_path);
            println!("Tables created: {table_count}");
            println!("\nDriftwood is ready. Next step: set up your .env file");
            println!("  (DRIFTWOOD_ACCOUNTS, TIMELINE_API_URL, and the four credential vars)");
            println!("\nThen run: driftwood crawl");
        }

        Commands::Crawl { limit, keep_going } => {
            let config = Config::load()?;
            config.require_accounts()?;
            config.require_api()?;
            let store = driftwood::db::open(&config.db_path)?;

            let fetch_limit = limit.unwrap_or(config.fetch_limit);
            println!(
                "Crawling {} account(s), up to {} posts each...",
                config.accounts.len(),
                fetch_limit
            );

            let client = driftwood::source::client::TimelineClient::new(
                &config.api_url,
                &config.credentials,
            )?;

            let summary = driftwood::pipeline::crawl::run(
                &client,
                &store,
                &config.accounts,
                fetch_limit,
                keep_going,
            )
            .await?;

            println!("\n{}", "Crawl complete.".bold());
            println!("  Posts fetched: {}", summary.posts_fetched);
            println!("  Posts written: {}", summary.posts_written);
            if summary.accounts_failed > 0 {
                println!(
                    "  {}",
                    format!("Accounts skipped after errors: {}", summary.accounts_failed).yellow()
                );
            }
        }

        Commands::Normalize { text } => {
            let normalizer = driftwood::normalize::TextNormalizer::new();
            println!("{}", normalizer.normalize(&text));
        }

        Commands::Status => {
            let config = Config::load()?;
            if !Path::new(&config.db_path).exists() {
                println!("Database: not initialized");
                println!("\nRun `driftwood init` to set up the database.");
                return Ok(());
            }
            let store = driftwood::db::open(&config.db_path)?;
            driftwood::status::show(&store, &config.db_path).await?;
        }
    }

    Ok(())
}
