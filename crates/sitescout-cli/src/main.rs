mod scrape;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "sitescout-cli")]
#[command(about = "Restaurant website metadata scraper")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Scrape a restaurant website and print the result as JSON
    Scrape {
        /// Website URL; `https://` is assumed when the scheme is missing
        url: String,
        /// Restaurant display name, enables the OpenTable / Resy searches
        #[arg(long)]
        name: Option<String>,
        /// Print single-line JSON instead of pretty output
        #[arg(long)]
        compact: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Loads `.env` before reading the environment.
    let config = sitescout_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Scrape { url, name, compact }) => {
            scrape::run_scrape(&config, &url, name.as_deref(), compact).await?;
        }
        None => println!("sitescout-cli: try `sitescout-cli scrape <URL>`"),
    }

    Ok(())
}
