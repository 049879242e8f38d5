//! Listing-page entries and the poster lookup page.

use cinedata_movie_models::ListingEntry;
use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, attr, collapsed_text, find_all, find_first};

/// Every title link on a listing page, in document order.
///
/// An anchor without a title heading is skipped with a warning. A missing
/// `href` becomes an empty link, which the assembler rejects later.
/// Image URLs are left unresolved.
#[must_use]
pub fn extract_listing_entries(doc: &Document) -> Vec<ListingEntry> {
    let heading = Query::tag("h3").class("ipc-title__text");

    find_all(Some(doc.root()), &Query::tag("a").class("ipc-title-link-wrapper"))
        .into_iter()
        .filter_map(|anchor| {
            let link = attr(Some(anchor), "href").unwrap_or_default();
            let title = collapsed_text(find_first(Some(anchor), &heading));
            if title.is_empty() {
                log::warn!("{}: listing link '{link}' has no title, skipping", doc.url());
                return None;
            }
            Some(ListingEntry::new(title, link))
        })
        .collect()
}

/// The first absolute `https://` image source on a media-viewer page.
#[must_use]
pub fn extract_image_url(doc: &Document) -> Option<String> {
    let url = find_all(Some(doc.root()), &Query::tag("img").has_attr("src"))
        .into_iter()
        .filter_map(|img| attr(Some(img), "src"))
        .find(|src| src.starts_with("https://"))
        .map(str::to_owned);

    if url.is_none() {
        log::debug!("{}: no https image source", doc.url());
    }
    url
}
