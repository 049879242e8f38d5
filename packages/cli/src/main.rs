#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for the cinedata movie scraper.
//!
//! `cinedata scrape --genre drama` crawls one genre listing and writes the
//! JSON and CSV datasets. Run without a subcommand it asks for the genre
//! interactively and uses the default output paths.
//!
//! Log output goes through [`cinedata_cli_utils::init_logger`] so log lines
//! and the progress bar share the terminal.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use commands::ScrapeArgs;

#[derive(Parser)]
#[command(name = "cinedata", about = "Scrape movie listings into JSON and CSV datasets")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl a genre listing and write the JSON and CSV datasets
    Scrape(ScrapeArgs),

    /// Print the entries of a genre listing without visiting them
    Listing {
        /// Genre to list
        #[arg(long)]
        genre: String,

        /// Crawl settings file overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Assemble a single movie and print it as JSON
    Movie {
        /// Detail link, e.g. `/title/tt0111161/`
        link: String,

        /// Also write the record to this JSON file
        #[arg(long)]
        json: Option<PathBuf>,

        /// Crawl settings file overriding the built-in defaults
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load a JSON or CSV dataset and print a summary
    Inspect {
        /// Dataset file (`.json` or `.csv`)
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = cinedata_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Scrape(args)) => commands::scrape(&multi, args).await?,
        Some(Commands::Listing { genre, config }) => {
            commands::listing(&genre, config.as_deref()).await?;
        }
        Some(Commands::Movie { link, json, config }) => {
            commands::movie(&link, json.as_deref(), config.as_deref()).await?;
        }
        Some(Commands::Inspect { path }) => commands::inspect(&path)?,
        None => {
            let genre = cinedata_cli_utils::prompt_genre()?;
            commands::scrape(
                &multi,
                ScrapeArgs {
                    genre,
                    ..ScrapeArgs::default()
                },
            )
            .await?;
        }
    }

    Ok(())
}
