//! Release date, country of origin and language from the "Details" section.

use cinedata_movie_models::{Details, NOT_AVAILABLE};
use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, collapsed_text, find_all, find_first};
use scraper::ElementRef;

use crate::Extracted;

const RELEASE_DATE_SLOT: usize = 1;
const COUNTRY_SLOT: usize = 3;
const LANGUAGE_SLOT: usize = 7;

/// Reads list items 1, 3 and 7 of the "Details" section.
///
/// Each slot falls back to [`NOT_AVAILABLE`] on its own; a page without the
/// section yields all three defaults.
#[must_use]
pub fn extract_details(doc: &Document) -> Details {
    let section = find_first(
        Some(doc.root()),
        &Query::tag("section").attr("data-testid", "Details"),
    );
    if section.is_none() {
        log::warn!("{}: no Details section", doc.url());
        return Details::default();
    }
    let items = find_all(section, &Query::tag("li"));

    Details {
        release_date: slot(&items, RELEASE_DATE_SLOT, "details.releaseDate").into_value(),
        country_of_origin: slot(&items, COUNTRY_SLOT, "details.countryOfOrigin").into_value(),
        language: slot(&items, LANGUAGE_SLOT, "details.language").into_value(),
    }
}

fn slot(items: &[ElementRef<'_>], index: usize, field: &'static str) -> Extracted<String> {
    let text = collapsed_text(items.get(index).copied());
    if text.is_empty() {
        return Extracted::defaulted(
            field,
            NOT_AVAILABLE.to_owned(),
            format!("no text at list item {index}"),
        );
    }
    Extracted::Found(text)
}
