//! Bounded worker pool over listing entries.
//!
//! Workers are futures joined on the caller's task rather than spawned,
//! because parsed documents are not `Send`. Each worker claims the next
//! entry index from a shared cursor and stores its outcome in that index's
//! slot, so output order always matches listing order regardless of which
//! fetch finishes first. Cancellation is checked before each claim; an entry
//! that was never claimed leaves its slot empty and is reported as cancelled.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use cinedata_extract::extract_listing_entries;
use cinedata_extract::links::listing_url;
use cinedata_movie_models::{ListingEntry, MovieRecord};
use cinedata_scraper::{Fetch, FetchError};

use crate::progress::ProgressCallback;
use crate::{AssemblyError, CrawlConfig, assemble};

/// Errors that stop a crawl before any entry is assembled.
#[derive(Debug, thiserror::Error)]
pub enum CrawlError {
    /// The listing page could not be fetched.
    #[error("listing page fetch failed: {0}")]
    ListingFetch(#[from] FetchError),

    /// The listing page has no movie links.
    #[error("no movies found on {url}")]
    EmptyListing {
        /// The listing page URL.
        url: String,
    },
}

/// Outcome of a batch, in listing order.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Successfully assembled records.
    pub records: Vec<MovieRecord>,
    /// Entries that were rejected.
    pub failures: Vec<AssemblyError>,
    /// Detail links of entries skipped because the batch was cancelled.
    pub cancelled: Vec<String>,
}

impl BatchReport {
    /// Entries the batch was given.
    #[must_use]
    pub fn total(&self) -> usize {
        self.records.len() + self.failures.len() + self.cancelled.len()
    }

    /// One-line summary for logs and progress output.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut summary = format!(
            "{} of {} movies assembled, {} failed",
            self.records.len(),
            self.total(),
            self.failures.len()
        );
        if !self.cancelled.is_empty() {
            summary.push_str(&format!(", {} cancelled", self.cancelled.len()));
        }
        summary
    }
}

/// Assembles `entries` with up to [`CrawlConfig::workers`] in flight.
///
/// Never fails as a whole: each entry ends up in exactly one of the report's
/// lists.
pub async fn assemble_all<F: Fetch>(
    fetcher: &F,
    config: &CrawlConfig,
    entries: &[ListingEntry],
    progress: &Arc<dyn ProgressCallback>,
    cancel: &AtomicBool,
) -> BatchReport {
    let total = entries.len();
    let cursor = AtomicUsize::new(0);
    let slots: Mutex<Vec<Option<Result<MovieRecord, AssemblyError>>>> =
        Mutex::new((0..total).map(|_| None).collect());

    progress.set_total(total as u64);
    log::info!(
        "Assembling {total} movies (concurrency={})",
        config.workers().min(total.max(1))
    );

    let worker = |id: usize| {
        let cursor = &cursor;
        let slots = &slots;
        async move {
            loop {
                if cancel.load(Ordering::Relaxed) {
                    log::debug!("worker {id}: cancelled");
                    break;
                }
                let index = cursor.fetch_add(1, Ordering::Relaxed);
                let Some(entry) = entries.get(index) else {
                    break;
                };

                progress.set_message(format!("Processing movie {}: {}", index + 1, entry.title));
                let result = assemble(fetcher, config, entry).await;
                if let Err(e) = &result {
                    log::warn!("Movie {} ({}) failed at {}: {e}", index + 1, entry.title, e.stage());
                }
                slots.lock().unwrap_or_else(PoisonError::into_inner)[index] = Some(result);
                progress.inc(1);
            }
        }
    };

    futures::future::join_all((0..config.workers().min(total)).map(worker)).await;

    let mut report = BatchReport::default();
    let slots = slots.into_inner().unwrap_or_else(PoisonError::into_inner);
    for (entry, slot) in entries.iter().zip(slots) {
        match slot {
            Some(Ok(record)) => report.records.push(record),
            Some(Err(e)) => report.failures.push(e),
            None => report.cancelled.push(entry.detail_link.clone()),
        }
    }

    log::info!("{}", report.summary());
    progress.finish(report.summary());
    report
}

/// Fetches the listing page for `genre` and returns at most
/// [`CrawlConfig::max_movies`] entries.
///
/// # Errors
///
/// Returns [`CrawlError::ListingFetch`] if the listing page cannot be
/// fetched and [`CrawlError::EmptyListing`] if it has no movie links.
pub async fn fetch_listing<F: Fetch>(
    fetcher: &F,
    config: &CrawlConfig,
    genre: &str,
) -> Result<Vec<ListingEntry>, CrawlError> {
    let url = listing_url(&config.base_url, genre);
    log::info!("Fetching listing page {url}");

    let mut entries = {
        let page = fetcher.fetch(&url).await?;
        extract_listing_entries(&page)
    };
    if entries.is_empty() {
        return Err(CrawlError::EmptyListing { url });
    }

    log::info!("Found {} movies on listing page", entries.len());
    entries.truncate(config.max_movies);
    Ok(entries)
}

/// Fetches the listing for `genre` and assembles its entries.
///
/// # Errors
///
/// Returns [`CrawlError`] if the listing cannot be fetched or is empty.
pub async fn crawl_listing<F: Fetch>(
    fetcher: &F,
    config: &CrawlConfig,
    genre: &str,
    progress: &Arc<dyn ProgressCallback>,
    cancel: &AtomicBool,
) -> Result<BatchReport, CrawlError> {
    let entries = fetch_listing(fetcher, config, genre).await?;
    Ok(assemble_all(fetcher, config, &entries, progress, cancel).await)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::fixtures::{BASE, FixtureFetcher, detail_page, listing_page, reviews_page};
    use crate::{AssemblyStage, null_progress};

    fn config(concurrency: usize) -> CrawlConfig {
        CrawlConfig {
            base_url: BASE.to_owned(),
            concurrency,
            ..CrawlConfig::default()
        }
    }

    fn movie(fetcher: FixtureFetcher, id: &str, name: &str) -> FixtureFetcher {
        fetcher
            .page(&format!("/title/{id}/"), &detail_page(name, Some("7.0")))
            .page(&format!("/title/{id}/reviews"), &reviews_page(1))
    }

    #[tokio::test]
    async fn keeps_listing_order_when_later_entries_finish_first() {
        let fetcher = movie(movie(FixtureFetcher::new(), "tt001", "Alpha"), "tt002", "Beta")
            .page(
                "/search/title/",
                &listing_page(&[("Alpha", "/title/tt001/"), ("Beta", "/title/tt002/")]),
            )
            .delay("/title/tt001/", Duration::from_millis(50));

        let cancel = AtomicBool::new(false);
        let report = crawl_listing(&fetcher, &config(2), "drama", &null_progress(), &cancel)
            .await
            .unwrap();

        let ids: Vec<&str> = report.records.iter().map(|r| r.imdb_id.as_str()).collect();
        assert_eq!(ids, vec!["tt001", "tt002"]);

        let completed = fetcher.completed();
        let position = |path: &str| {
            completed
                .iter()
                .position(|url| url == &format!("{BASE}{path}"))
                .unwrap()
        };
        assert!(position("/title/tt002/") < position("/title/tt001/"));
    }

    #[tokio::test]
    async fn failures_are_reported_alongside_records() {
        let fetcher = movie(FixtureFetcher::new(), "tt001", "Alpha");
        let entries = vec![
            ListingEntry::new("Alpha", "/title/tt001/"),
            ListingEntry::new("Missing", "/title/tt404/"),
        ];
        let cancel = AtomicBool::new(false);
        let report =
            assemble_all(&fetcher, &config(4), &entries, &null_progress(), &cancel).await;

        assert_eq!(report.records.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].stage(), AssemblyStage::DetailFetch);
        assert_eq!(report.failures[0].link(), "/title/tt404/");
        assert_eq!(report.summary(), "1 of 2 movies assembled, 1 failed");
    }

    #[tokio::test]
    async fn cancelled_batch_assembles_nothing() {
        let fetcher = movie(FixtureFetcher::new(), "tt001", "Alpha");
        let entries = vec![ListingEntry::new("Alpha", "/title/tt001/")];
        let cancel = AtomicBool::new(true);
        let report =
            assemble_all(&fetcher, &config(1), &entries, &null_progress(), &cancel).await;

        assert!(report.records.is_empty());
        assert_eq!(report.cancelled, vec!["/title/tt001/"]);
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn listing_is_capped_at_max_movies() {
        let fetcher = FixtureFetcher::new().page(
            "/search/title/",
            &listing_page(&[("A", "/title/tt1/"), ("B", "/title/tt2/"), ("C", "/title/tt3/")]),
        );
        let config = CrawlConfig {
            max_movies: 2,
            ..config(1)
        };
        let entries = fetch_listing(&fetcher, &config, "comedy").await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].detail_link, "/title/tt2/");
    }

    #[tokio::test]
    async fn empty_listing_is_an_error() {
        let fetcher = FixtureFetcher::new().page("/search/title/", &listing_page(&[]));
        let err = fetch_listing(&fetcher, &config(1), "none").await.unwrap_err();
        assert!(matches!(err, CrawlError::EmptyListing { .. }));
    }

    #[tokio::test]
    async fn unreachable_listing_is_an_error() {
        let err = fetch_listing(&FixtureFetcher::new(), &config(1), "drama")
            .await
            .unwrap_err();
        assert!(matches!(err, CrawlError::ListingFetch(_)));
    }

    #[tokio::test]
    async fn empty_batch_is_an_empty_report() {
        let cancel = AtomicBool::new(false);
        let report = assemble_all(
            &FixtureFetcher::new(),
            &config(4),
            &[],
            &null_progress(),
            &cancel,
        )
        .await;
        assert_eq!(report.total(), 0);
    }
}
