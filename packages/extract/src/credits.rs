//! Directors, writers and stars from the principal-credits list.

use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, find_all, find_first, stripped_strings};
use scraper::ElementRef;

use crate::Extracted;

/// The three credit groups of a detail page.
#[derive(Debug, Clone, PartialEq)]
pub struct Credits {
    pub directors: Extracted<Vec<String>>,
    pub writers: Extracted<Vec<String>>,
    pub stars: Extracted<Vec<String>>,
}

/// Position, record field and label texts of each credit group.
const GROUPS: [(usize, &str, [&str; 2]); 3] = [
    (0, "directors", ["Directors", "Director"]),
    (1, "writers", ["Writers", "Writer"]),
    (2, "stars", ["Stars", "Star"]),
];

/// Reads the credit groups by position (0 directors, 1 writers, 2 stars).
///
/// Each group is read independently: a missing item empties only that group.
/// The group's own label is dropped from the names.
#[must_use]
pub fn extract_credits(doc: &Document) -> Credits {
    let list = find_first(
        Some(doc.root()),
        &Query::tag("ul").class(
            "ipc-metadata-list ipc-metadata-list--dividers-all title-pc-list ipc-metadata-list--baseAlt",
        ),
    );
    let items = find_all(list, &Query::tag("li").class("ipc-metadata-list__item"));

    let [directors, writers, stars] = GROUPS
        .map(|(index, field, labels)| credit_group(items.get(index).copied(), field, labels));

    Credits {
        directors,
        writers,
        stars,
    }
}

fn credit_group(
    item: Option<ElementRef<'_>>,
    field: &'static str,
    labels: [&str; 2],
) -> Extracted<Vec<String>> {
    if item.is_none() {
        return Extracted::defaulted(field, Vec::new(), "credit item not found");
    }
    Extracted::Found(
        stripped_strings(item)
            .into_iter()
            .filter(|name| !labels.contains(&name.as_str()))
            .collect(),
    )
}
