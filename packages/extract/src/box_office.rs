//! Box-office figures.
//!
//! The section is a flat run of `li` elements (label items with their value
//! items nested inside), so figures sit at fixed positions: 0 budget, 2 and 7
//! gross amounts, 4 the opening weekend with its date. Each position is read
//! on its own and a failure only drops that figure.

use cinedata_movie_models::{BUDGET_KEY, BoxOffice, BoxOfficeValue, NOT_AVAILABLE};
use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, collapsed_text, find_all, find_first};

const BUDGET_SLOT: usize = 0;
const AMOUNT_SLOTS: [usize; 2] = [2, 7];
const OPENING_WEEKEND_SLOT: usize = 4;

/// Builds the box-office mapping.
///
/// When the section exists the mapping always contains [`BUDGET_KEY`],
/// falling back to `N/A`. When the whole section is missing the mapping is
/// empty and carries no [`BUDGET_KEY`] entry at all.
#[must_use]
pub fn extract_box_office(doc: &Document) -> BoxOffice {
    let mut data = BoxOffice::new();
    let section = find_first(
        Some(doc.root()),
        &Query::tag("section").attr("data-testid", "BoxOffice"),
    );
    if section.is_none() {
        log::debug!("{}: no BoxOffice section", doc.url());
        return data;
    }

    let texts: Vec<String> = find_all(section, &Query::tag("li"))
        .into_iter()
        .map(|item| collapsed_text(Some(item)))
        .collect();
    let text_at = |index: usize| texts.get(index).map(String::as_str);

    let budget = text_at(BUDGET_SLOT)
        .and_then(split_amount)
        .map_or_else(
            || {
                log::warn!("boxOffice: no budget figure; using default");
                NOT_AVAILABLE.to_owned()
            },
            |(_, amount)| amount,
        );
    data.insert(BUDGET_KEY.to_owned(), BoxOfficeValue::Amount(budget));

    for index in AMOUNT_SLOTS {
        match text_at(index).and_then(split_amount) {
            Some((key, amount)) => {
                data.insert(key, BoxOfficeValue::Amount(amount));
            }
            None => log::debug!("boxOffice: no amount at list item {index}"),
        }
    }

    match text_at(OPENING_WEEKEND_SLOT).and_then(split_dated) {
        Some((key, value)) => {
            data.insert(key, value);
        }
        None => log::debug!("boxOffice: no dated figure at list item {OPENING_WEEKEND_SLOT}"),
    }

    data
}

/// Splits `"Label $1,000 (estimated)"` into the trimmed label and the amount
/// from the first `$` up to the next one.
fn split_amount(text: &str) -> Option<(String, String)> {
    let mut parts = text.split('$');
    let key = parts.next()?.trim();
    let amount = parts.next()?.trim();
    Some((key.to_owned(), format!("${amount}")))
}

/// Splits `"Label $727,327 Sep 25, 1994"` at the first `$` and at the first
/// alphabetic character after it.
fn split_dated(text: &str) -> Option<(String, BoxOfficeValue)> {
    let dollar = text.find('$')?;
    let date_start = text[dollar + 1..]
        .char_indices()
        .find(|(_, c)| c.is_alphabetic())
        .map(|(i, _)| dollar + 1 + i)?;

    Some((
        text[..dollar].trim().to_owned(),
        BoxOfficeValue::Dated {
            collection: text[dollar..date_start].trim().to_owned(),
            date: text[date_start..].trim().to_owned(),
        },
    ))
}
