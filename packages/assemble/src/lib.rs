#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Record assembly and listing crawls.
//!
//! [`assemble`] turns one [`ListingEntry`] into a [`MovieRecord`] by fetching
//! its detail page, reviews page and poster page and running every field
//! extractor. Field-level problems degrade to defaults; only a failed detail
//! fetch, a missing title, an unusable link or (optionally) a failed reviews
//! fetch reject the record.
//!
//! [`batch`] runs many assemblies through a bounded worker pool while
//! keeping listing order.

pub mod batch;
pub mod config;
pub mod progress;

#[cfg(test)]
pub(crate) mod fixtures;

use cinedata_extract::links::{detail_url, image_page_url, imdb_id_from_link, reviews_url};
use cinedata_extract::numbers::parse_rating;
use cinedata_extract::{
    Credits, ExtractError, Extracted, extract_box_office, extract_credits, extract_details,
    extract_image_url, extract_name, extract_rating, extract_review_info, extract_storyline,
    extract_user_reviews, extract_year_duration_category, review_counts,
};
use cinedata_movie_models::{BoxOffice, Details, ListingEntry, MovieRecord};
use cinedata_scraper::{Document, Fetch, FetchError};

pub use batch::{BatchReport, CrawlError, assemble_all, crawl_listing, fetch_listing};
pub use config::{ConfigError, CrawlConfig};
pub use progress::{NullProgress, ProgressCallback, null_progress};

/// The step at which a record was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyStage {
    InvalidLink,
    DetailFetch,
    MissingName,
    ReviewsFetch,
}

impl std::fmt::Display for AssemblyStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::InvalidLink => "invalid link",
            Self::DetailFetch => "detail fetch",
            Self::MissingName => "missing name",
            Self::ReviewsFetch => "reviews fetch",
        })
    }
}

/// Why a listing entry produced no record.
#[derive(Debug, thiserror::Error)]
pub enum AssemblyError {
    /// No movie id could be derived from the detail link.
    #[error("no movie id in detail link '{link}'")]
    InvalidLink {
        /// The offending detail link.
        link: String,
    },

    /// The detail page could not be fetched.
    #[error("detail page fetch failed for {link}: {source}")]
    DetailFetch {
        /// The detail link being assembled.
        link: String,
        /// The fetch failure.
        source: FetchError,
    },

    /// The detail page has no title.
    #[error("detail page for {link} has no movie name")]
    MissingName {
        /// The detail link being assembled.
        link: String,
        /// The extraction failure.
        source: ExtractError,
    },

    /// The reviews page could not be fetched and reviews are required.
    #[error("reviews page fetch failed for {link}: {source}")]
    ReviewsFetch {
        /// The detail link being assembled.
        link: String,
        /// The fetch failure.
        source: FetchError,
    },
}

impl AssemblyError {
    /// The detail link of the rejected entry.
    #[must_use]
    pub fn link(&self) -> &str {
        match self {
            Self::InvalidLink { link }
            | Self::DetailFetch { link, .. }
            | Self::MissingName { link, .. }
            | Self::ReviewsFetch { link, .. } => link,
        }
    }

    #[must_use]
    pub const fn stage(&self) -> AssemblyStage {
        match self {
            Self::InvalidLink { .. } => AssemblyStage::InvalidLink,
            Self::DetailFetch { .. } => AssemblyStage::DetailFetch,
            Self::MissingName { .. } => AssemblyStage::MissingName,
            Self::ReviewsFetch { .. } => AssemblyStage::ReviewsFetch,
        }
    }
}

/// Every field read from the detail page.
struct DetailFields {
    name: String,
    year_duration_category: Vec<String>,
    rating: f64,
    user_review_count: u64,
    critic_review_count: u64,
    metascore: u64,
    plot: String,
    credits: Credits,
    details: Details,
    box_office: BoxOffice,
}

impl DetailFields {
    fn extract(doc: &Document) -> Result<Self, ExtractError> {
        let name = extract_name(doc)?;
        let counts = review_counts(&extract_review_info(doc));

        Ok(Self {
            name,
            year_duration_category: extract_year_duration_category(doc).into_value(),
            rating: rating_value(&extract_rating(doc)),
            user_review_count: counts.user_reviews.into_value(),
            critic_review_count: counts.critic_reviews.into_value(),
            metascore: counts.metascore.into_value(),
            plot: extract_storyline(doc).into_value(),
            credits: extract_credits(doc),
            details: extract_details(doc),
            box_office: extract_box_office(doc),
        })
    }
}

/// Numeric rating; the "No rating found" sentinel and unparseable text
/// become `0.0`.
fn rating_value(rating: &Extracted<String>) -> f64 {
    match rating {
        Extracted::Found(text) => parse_rating(text).unwrap_or_else(|| {
            log::warn!("rating: unparseable value '{text}'; using 0");
            0.0
        }),
        Extracted::Defaulted { .. } => 0.0,
    }
}

/// Builds the record for `entry`.
///
/// Fetches the detail page, then the reviews page, then the poster page
/// when the entry has no image yet.
///
/// # Errors
///
/// Returns [`AssemblyError`] when the link has no movie id, the detail page
/// cannot be fetched or has no title, or the reviews page cannot be fetched
/// while [`CrawlConfig::require_reviews`] is set.
pub async fn assemble<F: Fetch>(
    fetcher: &F,
    config: &CrawlConfig,
    entry: &ListingEntry,
) -> Result<MovieRecord, AssemblyError> {
    let link = entry.detail_link.as_str();
    let imdb_id = imdb_id_from_link(link)
        .ok_or_else(|| AssemblyError::InvalidLink {
            link: link.to_owned(),
        })?
        .to_owned();

    let url = detail_url(&config.base_url, link);
    log::info!("Assembling '{}' from {url}", entry.title);

    // The parsed page is not Send; keep it scoped to this block.
    let fields = {
        let detail = fetcher
            .fetch(&url)
            .await
            .map_err(|source| AssemblyError::DetailFetch {
                link: link.to_owned(),
                source,
            })?;
        DetailFields::extract(&detail).map_err(|source| AssemblyError::MissingName {
            link: link.to_owned(),
            source,
        })?
    };

    let user_reviews = match fetcher.fetch(&reviews_url(&config.base_url, &imdb_id)).await {
        Ok(page) => extract_user_reviews(&page),
        Err(source) if config.require_reviews => {
            return Err(AssemblyError::ReviewsFetch {
                link: link.to_owned(),
                source,
            });
        }
        Err(e) => {
            log::warn!("{link}: reviews unavailable ({e}); continuing without reviews");
            Vec::new()
        }
    };

    let image_url = match entry.image_url.as_deref() {
        Some(url) if !url.is_empty() => Some(url.to_owned()),
        _ => lookup_image_url(fetcher, &config.base_url, &imdb_id).await,
    };

    let Credits {
        directors,
        writers,
        stars,
    } = fields.credits;

    Ok(MovieRecord {
        name: fields.name,
        imdb_id,
        detail_link: link.to_owned(),
        listing_title: (!entry.title.is_empty()).then(|| entry.title.clone()),
        image_url,
        year_duration_category: fields.year_duration_category,
        rating: fields.rating,
        user_review_count: fields.user_review_count,
        critic_review_count: fields.critic_review_count,
        metascore: fields.metascore,
        plot: fields.plot,
        user_reviews,
        directors: directors.into_value(),
        writers: writers.into_value(),
        stars: stars.into_value(),
        details: fields.details,
        box_office: fields.box_office,
    })
}

/// Resolves a poster URL from the media-viewer page. Any failure yields
/// `None`.
pub async fn lookup_image_url<F: Fetch>(
    fetcher: &F,
    base_url: &str,
    imdb_id: &str,
) -> Option<String> {
    match fetcher.fetch(&image_page_url(base_url, imdb_id)).await {
        Ok(page) => extract_image_url(&page),
        Err(e) => {
            log::warn!("{imdb_id}: image lookup failed: {e}");
            None
        }
    }
}
