#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Movie listing entries and the normalized movie record.
//!
//! Every crawl produces [`MovieRecord`] values with an identical field set.
//! Fields whose extraction degraded carry the documented defaults
//! ([`NOT_AVAILABLE`], [`NO_STORYLINE`], `0`, empty lists) rather than being
//! omitted, so the dataset writer can rely on uniform columns.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel for a detail slot that was absent from the page.
pub const NOT_AVAILABLE: &str = "N/A";

/// Default plot text when the storyline block is missing.
pub const NO_STORYLINE: &str = "No storyline found";

/// Sentinel returned by the rating extractor when the rating container is
/// missing.
pub const NO_RATING: &str = "No rating found";

/// One movie link found on a listing page.
///
/// `detail_link` is the site-relative path (e.g. `/title/tt0111161/`) and is
/// the join key to the detail page, the reviews page, and the output record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListingEntry {
    /// Title as shown on the listing page.
    pub title: String,
    /// Site-relative link to the movie's detail page.
    pub detail_link: String,
    /// Poster URL, once resolved from the image-lookup page.
    pub image_url: Option<String>,
}

impl ListingEntry {
    /// Creates an entry with no image resolved yet.
    #[must_use]
    pub fn new(title: impl Into<String>, detail_link: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            detail_link: detail_link.into(),
            image_url: None,
        }
    }
}

/// A single user review from the reviews page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserReview {
    /// Reviewer's score as displayed (e.g. `"8"`), `"0"` when unrated.
    pub rating: String,
    /// Review headline.
    pub title: String,
    /// Review body.
    pub content: String,
}

/// Release/origin/language slots from the detail page's "Details" section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    pub release_date: String,
    pub country_of_origin: String,
    pub language: String,
}

impl Default for Details {
    fn default() -> Self {
        Self {
            release_date: NOT_AVAILABLE.to_owned(),
            country_of_origin: NOT_AVAILABLE.to_owned(),
            language: NOT_AVAILABLE.to_owned(),
        }
    }
}

/// A box-office figure.
///
/// Most slots are a bare amount (`"$100,000,000 (estimated)"`); the opening
/// weekend slot also carries the date the figure was recorded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BoxOfficeValue {
    /// A monetary amount, including its leading currency sign.
    Amount(String),
    /// An amount paired with the date it refers to.
    Dated {
        /// The monetary figure.
        collection: String,
        /// Free-form date text following the figure.
        date: String,
    },
}

/// Box-office mapping keyed by the label text that preceded each figure.
///
/// The key set depends on the page; only `Budget` is always present.
pub type BoxOffice = BTreeMap<String, BoxOfficeValue>;

/// Key under which the first box-office slot is stored.
pub const BUDGET_KEY: &str = "Budget";

/// A fully assembled movie.
///
/// Field order here is the column order of the CSV output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    /// Title from the detail page hero block.
    pub name: String,
    /// External identifier derived from the detail link (e.g. `tt0111161`).
    pub imdb_id: String,
    /// Site-relative detail link this record was assembled from.
    pub detail_link: String,
    /// Title from the listing page, when the record came from a listing.
    pub listing_title: Option<String>,
    /// Poster URL from the image-lookup page.
    pub image_url: Option<String>,
    /// `[year, category, duration]` in document order, or empty.
    ///
    /// Positional: a markup change that adds or reorders items silently
    /// shifts the meaning of each slot.
    pub year_duration_category: Vec<String>,
    pub rating: f64,
    pub user_review_count: u64,
    pub critic_review_count: u64,
    pub metascore: u64,
    pub plot: String,
    pub user_reviews: Vec<UserReview>,
    pub directors: Vec<String>,
    pub writers: Vec<String>,
    pub stars: Vec<String>,
    pub details: Details,
    pub box_office: BoxOffice,
}

impl MovieRecord {
    /// Serialized names of fields holding lists or mappings.
    pub const STRUCTURED_FIELDS: &[&str] = &[
        "yearDurationCategory",
        "userReviews",
        "directors",
        "writers",
        "stars",
        "details",
        "boxOffice",
    ];

    /// Serialized names of numeric fields.
    pub const NUMERIC_FIELDS: &[&str] = &[
        "rating",
        "userReviewCount",
        "criticReviewCount",
        "metascore",
    ];

    /// Serialized names of fields that may be `null`.
    pub const OPTIONAL_FIELDS: &[&str] = &["listingTitle", "imageUrl"];

    /// Release year, read positionally from [`Self::year_duration_category`].
    #[must_use]
    pub fn year(&self) -> Option<&str> {
        self.year_duration_category.first().map(String::as_str)
    }

    /// Certification/category, read positionally.
    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.year_duration_category.get(1).map(String::as_str)
    }

    /// Running time, read positionally.
    #[must_use]
    pub fn duration(&self) -> Option<&str> {
        self.year_duration_category.get(2).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MovieRecord {
        let mut box_office = BoxOffice::new();
        box_office.insert(
            BUDGET_KEY.to_owned(),
            BoxOfficeValue::Amount("$25,000,000 (estimated)".to_owned()),
        );
        box_office.insert(
            "Opening weekend US & Canada".to_owned(),
            BoxOfficeValue::Dated {
                collection: "$727,327".to_owned(),
                date: "Sep 25, 1994".to_owned(),
            },
        );

        MovieRecord {
            name: "The Shawshank Redemption".to_owned(),
            imdb_id: "tt0111161".to_owned(),
            detail_link: "/title/tt0111161/".to_owned(),
            listing_title: Some("1. The Shawshank Redemption".to_owned()),
            image_url: None,
            year_duration_category: vec!["1994".to_owned(), "R".to_owned(), "2h 22m".to_owned()],
            rating: 9.3,
            user_review_count: 11_000,
            critic_review_count: 180,
            metascore: 82,
            plot: "Two imprisoned men bond.".to_owned(),
            user_reviews: vec![],
            directors: vec!["Frank Darabont".to_owned()],
            writers: vec!["Stephen King".to_owned(), "Frank Darabont".to_owned()],
            stars: vec!["Tim Robbins".to_owned()],
            details: Details::default(),
            box_office,
        }
    }

    #[test]
    fn serializes_with_camel_case_keys_in_declaration_order() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();
        assert!(object.contains_key("imdbId"));
        assert!(object.contains_key("yearDurationCategory"));
        assert!(object.contains_key("boxOffice"));
        assert_eq!(object["details"]["releaseDate"], "N/A");
        assert!(object["imageUrl"].is_null());
    }

    #[test]
    fn box_office_values_round_trip_untagged() {
        let record = sample();
        let json = serde_json::to_string(&record.box_office).unwrap();
        assert!(json.contains(r#""Budget":"$25,000,000 (estimated)""#));
        assert!(json.contains(r#""collection":"$727,327""#));
        let back: BoxOffice = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record.box_office);
    }

    #[test]
    fn positional_accessors_follow_list_order() {
        let record = sample();
        assert_eq!(record.year(), Some("1994"));
        assert_eq!(record.category(), Some("R"));
        assert_eq!(record.duration(), Some("2h 22m"));

        let empty = MovieRecord {
            year_duration_category: vec![],
            ..record
        };
        assert_eq!(empty.year(), None);
        assert_eq!(empty.duration(), None);
    }

    #[test]
    fn field_lists_cover_only_serialized_keys() {
        let value = serde_json::to_value(sample()).unwrap();
        let object = value.as_object().unwrap();
        for key in MovieRecord::STRUCTURED_FIELDS
            .iter()
            .chain(MovieRecord::NUMERIC_FIELDS)
            .chain(MovieRecord::OPTIONAL_FIELDS)
        {
            assert!(object.contains_key(*key), "missing {key}");
        }
    }
}
