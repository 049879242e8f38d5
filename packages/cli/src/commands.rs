use std::error::Error;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use cinedata_assemble::{CrawlConfig, assemble, crawl_listing, fetch_listing};
use cinedata_cli_utils::{IndicatifProgress, MultiProgress};
use cinedata_dataset::{default_csv_path, default_json_path};
use cinedata_movie_models::{ListingEntry, MovieRecord};
use cinedata_scraper::http::HttpFetcher;
use clap::Args;

/// Options for a full crawl.
#[derive(Args, Debug, Default)]
pub struct ScrapeArgs {
    /// Genre to crawl, e.g. `drama`
    #[arg(long)]
    pub genre: String,

    /// Maximum number of movies to assemble
    #[arg(long)]
    pub limit: Option<usize>,

    /// Movies assembled at the same time
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// JSON output path [default: data_collect/movie_category-<genre>.json]
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// CSV output path [default: csv_files/movies_data-<genre>.csv]
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Crawl settings file overriding the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Keep movies whose reviews page cannot be fetched
    #[arg(long)]
    pub allow_missing_reviews: bool,
}

impl ScrapeArgs {
    /// Applies the command-line overrides on top of `config`.
    fn apply(&self, mut config: CrawlConfig) -> CrawlConfig {
        if let Some(limit) = self.limit {
            config.max_movies = limit;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        if self.allow_missing_reviews {
            config.require_reviews = false;
        }
        config
    }

    fn output_paths(&self, genre: &str) -> (PathBuf, PathBuf) {
        (
            self.json.clone().unwrap_or_else(|| default_json_path(genre)),
            self.csv.clone().unwrap_or_else(|| default_csv_path(genre)),
        )
    }
}

fn fetcher_for(config: &CrawlConfig) -> Result<HttpFetcher, Box<dyn Error>> {
    Ok(HttpFetcher::new(&config.to_fetcher_options())?)
}

/// Sets the returned flag on the first Ctrl-C.
///
/// Movies already being assembled finish; the rest are skipped.
fn cancel_on_ctrl_c() -> (Arc<AtomicBool>, tokio::task::JoinHandle<()>) {
    let cancel = Arc::new(AtomicBool::new(false));
    let flag = Arc::clone(&cancel);
    let watcher = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupted; finishing movies in flight");
            flag.store(true, Ordering::Relaxed);
        }
    });
    (cancel, watcher)
}

/// Crawls one genre and writes both dataset files.
///
/// # Errors
///
/// Fails when the genre is blank, the listing cannot be crawled, no movie
/// was assembled, or the dataset cannot be written.
pub async fn scrape(multi: &MultiProgress, args: ScrapeArgs) -> Result<(), Box<dyn Error>> {
    let genre = args.genre.trim();
    if genre.is_empty() {
        return Err("genre must not be empty".into());
    }

    let config = args.apply(CrawlConfig::load(args.config.as_deref())?);
    let fetcher = fetcher_for(&config)?;
    let progress = IndicatifProgress::movies_bar(multi, &format!("Fetching '{genre}' listing"));

    let (cancel, watcher) = cancel_on_ctrl_c();
    let report = crawl_listing(&fetcher, &config, genre, &progress, &cancel).await;
    watcher.abort();
    let report = report?;

    if !report.failures.is_empty() {
        println!("{} movies failed:", report.failures.len());
        for failure in &report.failures {
            println!("  {} ({}): {failure}", failure.link(), failure.stage());
        }
    }
    if !report.cancelled.is_empty() {
        println!("{} movies skipped after interrupt", report.cancelled.len());
    }

    if report.records.is_empty() {
        return Err(format!("no movie data collected for '{genre}'").into());
    }

    let (json_path, csv_path) = args.output_paths(genre);
    let written = cinedata_dataset::write(&report.records, &json_path, &csv_path)?;

    println!("Data collection successful: {written} movies");
    println!("  JSON: {}", json_path.display());
    println!("  CSV:  {}", csv_path.display());
    Ok(())
}

/// Prints the entries of one genre listing.
///
/// # Errors
///
/// Fails when the config cannot be loaded or the listing cannot be crawled.
pub async fn listing(genre: &str, config_path: Option<&Path>) -> Result<(), Box<dyn Error>> {
    let config = CrawlConfig::load(config_path)?;
    let fetcher = fetcher_for(&config)?;
    let entries = fetch_listing(&fetcher, &config, genre.trim()).await?;

    for (index, entry) in entries.iter().enumerate() {
        println!("{:>3}. {:<50} {}", index + 1, entry.title, entry.detail_link);
    }
    Ok(())
}

/// Assembles one movie and prints it as pretty JSON.
///
/// # Errors
///
/// Fails when the movie cannot be assembled or the JSON file cannot be
/// written.
pub async fn movie(
    link: &str,
    json_path: Option<&Path>,
    config_path: Option<&Path>,
) -> Result<(), Box<dyn Error>> {
    let config = CrawlConfig::load(config_path)?;
    let fetcher = fetcher_for(&config)?;

    let record = assemble(&fetcher, &config, &ListingEntry::new("", link)).await?;
    println!("{}", serde_json::to_string_pretty(&record)?);

    if let Some(path) = json_path {
        cinedata_dataset::write_json(std::slice::from_ref(&record), path)?;
        log::info!("Record saved to {}", path.display());
    }
    Ok(())
}

fn summary_line(record: &MovieRecord) -> String {
    format!(
        "{:<10} {:<40} {:>4.1} {:>8} reviews  {}",
        record.imdb_id,
        record.name,
        record.rating,
        record.user_review_count,
        record.year_duration_category.join(" | ")
    )
}

/// Loads a dataset file and prints one line per movie.
///
/// # Errors
///
/// Fails when the file cannot be loaded.
pub fn inspect(path: &Path) -> Result<(), Box<dyn Error>> {
    let records = cinedata_dataset::read(path)?;
    println!("{}: {} movies", path.display(), records.len());
    for record in &records {
        println!("  {}", summary_line(record));
    }
    Ok(())
}
