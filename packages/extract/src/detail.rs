//! Hero-block fields of the detail page: name, year/category/duration,
//! rating, review counts and storyline.

use cinedata_movie_models::{NO_RATING, NO_STORYLINE};
use cinedata_scraper::Document;
use cinedata_scraper::select::{Query, collapsed_text, find_all, find_first, stripped_strings};

use crate::numbers::parse_count;
use crate::{ExtractError, Extracted};

fn name_query() -> Query {
    Query::tag("span").class("hero__primary-text")
}

fn year_duration_query() -> Query {
    Query::tag("ul").class(
        "ipc-inline-list ipc-inline-list--show-dividers sc-d8941411-2 cdJsTz baseAlt",
    )
}

fn rating_query() -> Query {
    Query::tag("div").attr("data-testid", "hero-rating-bar__aggregate-rating__score")
}

fn storyline_query() -> Query {
    Query::tag("div").class("ipc-html-content-inner-div")
}

/// The movie title. The only required field: a detail page without it is
/// not a movie page.
///
/// # Errors
///
/// Returns [`ExtractError::MissingName`] if the title element is absent or
/// empty.
pub fn extract_name(doc: &Document) -> Result<String, ExtractError> {
    let name = collapsed_text(find_first(Some(doc.root()), &name_query()));
    if name.is_empty() {
        return Err(ExtractError::MissingName {
            url: doc.url().to_owned(),
        });
    }
    Ok(name)
}

/// `[year, category, duration]` as the stripped strings of the inline list,
/// in document order. Empty when the list is absent.
#[must_use]
pub fn extract_year_duration_category(doc: &Document) -> Extracted<Vec<String>> {
    let Some(list) = find_first(Some(doc.root()), &year_duration_query()) else {
        return Extracted::defaulted(
            "yearDurationCategory",
            Vec::new(),
            "inline year/category/duration list not found",
        );
    };

    let items = stripped_strings(Some(list));
    if items.len() != 3 {
        log::debug!(
            "{}: year/category/duration list has {} items, positions may be shifted",
            doc.url(),
            items.len()
        );
    }
    Extracted::Found(items)
}

/// The aggregate rating text (e.g. `"7.4"`), or [`NO_RATING`].
#[must_use]
pub fn extract_rating(doc: &Document) -> Extracted<String> {
    let container = find_first(Some(doc.root()), &rating_query());
    match stripped_strings(container).into_iter().next() {
        Some(rating) => Extracted::Found(rating),
        None => Extracted::defaulted("rating", NO_RATING.to_owned(), "rating container not found"),
    }
}

/// The storyline paragraph, its text runs trimmed and joined with single
/// spaces, or [`NO_STORYLINE`]. Whitespace inside a run is kept as is.
#[must_use]
pub fn extract_storyline(doc: &Document) -> Extracted<String> {
    let plot = collapsed_text(find_first(Some(doc.root()), &storyline_query()));
    if plot.is_empty() {
        return Extracted::defaulted("plot", NO_STORYLINE.to_owned(), "storyline not found");
    }
    Extracted::Found(plot)
}

/// One label/score pair from the review summary strip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewScore {
    /// Label text, e.g. `"User reviews"`.
    pub label: String,
    /// Score text, e.g. `"1.2K"`.
    pub score: String,
}

/// All label/score pairs, in document order.
///
/// A wrapper missing its label or score keeps its position with an empty
/// string, so the positional mapping in [`review_counts`] is not shifted.
/// Returns an empty list when no wrappers exist.
#[must_use]
pub fn extract_review_info(doc: &Document) -> Vec<ReviewScore> {
    let label_query = Query::tag("span").class("label");
    let score_query = Query::tag("span").class("score");

    find_all(Some(doc.root()), &Query::tag("span").class("three-Elements"))
        .into_iter()
        .map(|wrapper| ReviewScore {
            label: collapsed_text(find_first(Some(wrapper), &label_query)),
            score: collapsed_text(find_first(Some(wrapper), &score_query)),
        })
        .collect()
}

/// Review counts read positionally from [`extract_review_info`].
#[derive(Debug, Clone, PartialEq)]
pub struct ReviewCounts {
    pub user_reviews: Extracted<u64>,
    pub critic_reviews: Extracted<u64>,
    pub metascore: Extracted<u64>,
}

/// Expected label keyword for each position of the review strip.
const REVIEW_SLOTS: [(&str, &str); 3] = [
    ("userReviewCount", "user"),
    ("criticReviewCount", "critic"),
    ("metascore", "metascore"),
];

/// Maps slots 0/1/2 to user reviews, critic reviews and metascore.
///
/// The mapping is by position. When fewer than three pairs exist every
/// count defaults to 0. A label that does not mention its expected keyword is
/// logged but the positional value is still used.
#[must_use]
pub fn review_counts(scores: &[ReviewScore]) -> ReviewCounts {
    if scores.len() < REVIEW_SLOTS.len() {
        let reason = format!("expected 3 review scores, found {}", scores.len());
        return ReviewCounts {
            user_reviews: Extracted::defaulted("userReviewCount", 0, reason.clone()),
            critic_reviews: Extracted::defaulted("criticReviewCount", 0, reason.clone()),
            metascore: Extracted::defaulted("metascore", 0, reason),
        };
    }

    ReviewCounts {
        user_reviews: count_at(scores, 0),
        critic_reviews: count_at(scores, 1),
        metascore: count_at(scores, 2),
    }
}

fn count_at(scores: &[ReviewScore], index: usize) -> Extracted<u64> {
    let (field, keyword) = REVIEW_SLOTS[index];
    let slot = &scores[index];
    if !slot.label.to_lowercase().contains(keyword) {
        log::warn!(
            "{field}: review slot {index} is labelled '{}', expected '{keyword}'",
            slot.label
        );
    }
    parse_count(&slot.score).map_or_else(
        || Extracted::defaulted(field, 0, format!("unparseable score '{}'", slot.score)),
        Extracted::Found,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(
            "https://www.imdb.com/title/tt001/",
            &format!("<html><body>{body}</body></html>"),
        )
    }

    #[test]
    fn extracts_name_from_hero_block() {
        let page = doc(r#"<h1><span class="hero__primary-text">Alpha</span></h1>"#);
        assert_eq!(extract_name(&page).unwrap(), "Alpha");
    }

    #[test]
    fn missing_name_is_an_error() {
        let page = doc("<h1>nothing</h1>");
        assert_eq!(
            extract_name(&page),
            Err(ExtractError::MissingName {
                url: "https://www.imdb.com/title/tt001/".to_owned()
            })
        );
    }

    #[test]
    fn reads_year_category_duration_in_order() {
        let page = doc(
            r#"<ul class="ipc-inline-list ipc-inline-list--show-dividers sc-d8941411-2 cdJsTz baseAlt">
                 <li><a> 1994 </a></li><li><a>R</a></li><li>2h 22m</li>
               </ul>"#,
        );
        assert_eq!(
            extract_year_duration_category(&page),
            Extracted::Found(vec!["1994".to_owned(), "R".to_owned(), "2h 22m".to_owned()])
        );
    }

    #[test]
    fn missing_year_list_yields_empty_default() {
        let result = extract_year_duration_category(&doc("<ul class=\"other\"></ul>"));
        assert!(result.is_default());
        assert!(result.value().is_empty());
    }

    #[test]
    fn trims_rating_text() {
        let page = doc(
            r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span> 7.4 </span><span>/10</span></div>"#,
        );
        assert_eq!(extract_rating(&page), Extracted::Found("7.4".to_owned()));
    }

    #[test]
    fn missing_rating_yields_sentinel() {
        let result = extract_rating(&doc("<div></div>"));
        assert!(result.is_default());
        assert_eq!(result.into_value(), "No rating found");
    }

    #[test]
    fn joins_trimmed_storyline_runs() {
        let page = doc(
            "<div class=\"ipc-html-content-inner-div\">  Two men bond\n <b> over </b> years. </div>",
        );
        assert_eq!(
            extract_storyline(&page).into_value(),
            "Two men bond over years."
        );
    }

    #[test]
    fn keeps_whitespace_inside_a_storyline_run() {
        let page = doc("<div class=\"ipc-html-content-inner-div\"> Two men\n  bond. </div>");
        assert_eq!(extract_storyline(&page).into_value(), "Two men\n  bond.");
    }

    #[test]
    fn missing_storyline_yields_default_text() {
        assert_eq!(
            extract_storyline(&doc("")).into_value(),
            "No storyline found"
        );
    }

    fn review_strip() -> Document {
        doc(r#"
            <span class="three-Elements"><span class="score">1.2K</span><span class="label">User reviews</span></span>
            <span class="three-Elements"><span class="score">350</span><span class="label">Critic reviews</span></span>
            <span class="three-Elements"><span class="score">74</span><span class="label">Metascore</span></span>
        "#)
    }

    #[test]
    fn reads_review_pairs_in_order() {
        let scores = extract_review_info(&review_strip());
        assert_eq!(scores.len(), 3);
        assert_eq!(scores[0].label, "User reviews");
        assert_eq!(scores[0].score, "1.2K");
        assert_eq!(scores[2].label, "Metascore");
    }

    #[test]
    fn no_review_wrappers_yield_empty_list() {
        assert!(extract_review_info(&doc("<span class=\"label\">x</span>")).is_empty());
    }

    #[test]
    fn maps_review_counts_by_position() {
        let counts = review_counts(&extract_review_info(&review_strip()));
        assert_eq!(counts.user_reviews, Extracted::Found(1_200));
        assert_eq!(counts.critic_reviews, Extracted::Found(350));
        assert_eq!(counts.metascore, Extracted::Found(74));
    }

    #[test]
    fn short_review_strip_defaults_every_count() {
        let scores = vec![ReviewScore {
            label: "User reviews".to_owned(),
            score: "10".to_owned(),
        }];
        let counts = review_counts(&scores);
        assert!(counts.user_reviews.is_default());
        assert!(counts.critic_reviews.is_default());
        assert_eq!(*counts.metascore.value(), 0);
    }

    #[test]
    fn unparseable_score_defaults_only_that_slot() {
        let mut scores = extract_review_info(&review_strip());
        scores[2].score = "tbd".to_owned();
        let counts = review_counts(&scores);
        assert_eq!(counts.user_reviews, Extracted::Found(1_200));
        assert!(counts.metascore.is_default());
    }
}
