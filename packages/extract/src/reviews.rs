//! User reviews from the reviews page.

use cinedata_movie_models::UserReview;
use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, collapsed_text, find_all, find_first, previous_sibling};
use scraper::ElementRef;

/// Rating recorded for a review that has no score.
pub const UNRATED: &str = "0";

/// Every review container on the page, in document order.
///
/// A container without a title or body is skipped with a warning; the rest
/// are kept. A page with no containers yields an empty list.
#[must_use]
pub fn extract_user_reviews(doc: &Document) -> Vec<UserReview> {
    let containers = find_all(Some(doc.root()), &Query::tag("div").class("review-container"));
    let total = containers.len();

    let reviews: Vec<UserReview> = containers
        .into_iter()
        .enumerate()
        .filter_map(|(index, container)| {
            let review = parse_review(container);
            if review.is_none() {
                log::warn!("{}: skipping review {index} with no title or content", doc.url());
            }
            review
        })
        .collect();

    log::debug!("{}: {}/{total} reviews extracted", doc.url(), reviews.len());
    reviews
}

fn parse_review(container: ElementRef<'_>) -> Option<UserReview> {
    let title = find_first(Some(container), &Query::tag("a").class("title"))?;
    let content = find_first(Some(container), &Query::tag("div").class("content"))?;

    let scale = find_first(Some(container), &Query::tag("span").class("point-scale"));
    let rating = match collapsed_text(previous_sibling(scale, "span")) {
        rating if rating.is_empty() => UNRATED.to_owned(),
        rating => rating,
    };

    Some(UserReview {
        rating,
        title: collapsed_text(Some(title)),
        content: collapsed_text(Some(content)),
    })
}
