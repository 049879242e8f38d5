#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Field extractors for movie listing, detail, reviews and image pages.
//!
//! Each extractor maps a parsed [`Document`](cinedata_scraper::Document) to
//! one field of a [`MovieRecord`](cinedata_movie_models::MovieRecord). They
//! are pure and independent: a missing or malformed element degrades only
//! the field it feeds, reported as [`Extracted::Defaulted`] together with a
//! logged diagnostic. The only hard failure is a missing title
//! ([`ExtractError::MissingName`]).
//!
//! The selectors below describe the source site's current markup. That
//! markup is an external, versionless contract; several extractors read
//! values by position and will silently mis-map fields if the site reorders
//! its lists.

pub mod box_office;
pub mod credits;
pub mod detail;
pub mod details;
pub mod links;
pub mod listing;
pub mod numbers;
pub mod reviews;

pub use box_office::extract_box_office;
pub use credits::{Credits, extract_credits};
pub use detail::{
    ReviewCounts, ReviewScore, extract_name, extract_rating, extract_review_info,
    extract_storyline, extract_year_duration_category, review_counts,
};
pub use details::extract_details;
pub use listing::{extract_image_url, extract_listing_entries};
pub use reviews::extract_user_reviews;

/// Errors for the fields whose absence invalidates the whole record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    /// The detail page has no title element.
    #[error("movie name not found on {url}")]
    MissingName {
        /// The detail page URL.
        url: String,
    },
}

/// Outcome of a degradable extractor.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted<T> {
    /// The value was read from the page.
    Found(T),
    /// The page did not provide the value; `value` is the documented default.
    Defaulted {
        /// The record field this value feeds.
        field: &'static str,
        /// The default substituted for the missing value.
        value: T,
        /// Why extraction fell back to the default.
        reason: String,
    },
}

impl<T> Extracted<T> {
    /// Builds a [`Extracted::Defaulted`] and logs the diagnostic.
    pub fn defaulted(field: &'static str, value: T, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        log::warn!("{field}: {reason}; using default");
        Self::Defaulted {
            field,
            value,
            reason,
        }
    }

    /// The extracted or substituted value.
    #[must_use]
    pub const fn value(&self) -> &T {
        match self {
            Self::Found(value) | Self::Defaulted { value, .. } => value,
        }
    }

    /// Consumes the outcome, keeping only the value.
    #[must_use]
    pub fn into_value(self) -> T {
        match self {
            Self::Found(value) | Self::Defaulted { value, .. } => value,
        }
    }

    /// Whether the value is a substituted default.
    #[must_use]
    pub const fn is_default(&self) -> bool {
        matches!(self, Self::Defaulted { .. })
    }

    /// Transforms the value, keeping the found/defaulted state.
    #[must_use]
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Extracted<U> {
        match self {
            Self::Found(value) => Extracted::Found(f(value)),
            Self::Defaulted {
                field,
                value,
                reason,
            } => Extracted::Defaulted {
                field,
                value: f(value),
                reason,
            },
        }
    }
}
