//! In-memory pages for driving assembly and crawls in tests.

use std::collections::BTreeMap;
use std::sync::Mutex;
use std::time::Duration;

use cinedata_scraper::{Document, Fetch, FetchError};

pub const BASE: &str = "https://fixture.test";

/// Serves pages by path, ignoring query strings. Unknown paths answer 404.
#[derive(Default)]
pub struct FixtureFetcher {
    pages: BTreeMap<String, String>,
    delays: BTreeMap<String, Duration>,
    requested: Mutex<Vec<String>>,
    completed: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, path: &str, body: &str) -> Self {
        self.pages.insert(format!("{BASE}{path}"), body.to_owned());
        self
    }

    pub fn delay(mut self, path: &str, delay: Duration) -> Self {
        self.delays.insert(format!("{BASE}{path}"), delay);
        self
    }

    /// URLs in request order.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }

    /// Successfully served URLs in completion order.
    pub fn completed(&self) -> Vec<String> {
        self.completed.lock().unwrap().clone()
    }
}

impl Fetch for FixtureFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        self.requested.lock().unwrap().push(url.to_owned());
        let key = url.split('?').next().unwrap_or_default();

        if let Some(delay) = self.delays.get(key) {
            tokio::time::sleep(*delay).await;
        }

        let Some(body) = self.pages.get(key) else {
            return Err(FetchError::HttpStatus {
                url: url.to_owned(),
                code: 404,
                reason: "Not Found".to_owned(),
            });
        };
        self.completed.lock().unwrap().push(key.to_owned());
        Ok(Document::parse(url, body))
    }
}

/// Which optional detail-page sections a fixture page carries.
#[derive(Debug, Clone, Copy)]
pub struct Sections {
    pub inline_list: bool,
    pub rating: bool,
    pub review_strip: bool,
    pub storyline: bool,
    pub credits: bool,
    pub details: bool,
    pub box_office: bool,
}

impl Sections {
    pub const ALL: Self = Self {
        inline_list: true,
        rating: true,
        review_strip: true,
        storyline: true,
        credits: true,
        details: true,
        box_office: true,
    };

    pub const fn from_flags(flags: [bool; 7]) -> Self {
        Self {
            inline_list: flags[0],
            rating: flags[1],
            review_strip: flags[2],
            storyline: flags[3],
            credits: flags[4],
            details: flags[5],
            box_office: flags[6],
        }
    }
}

/// A detail page with every section populated.
pub fn detail_page(name: &str, rating: Option<&str>) -> String {
    partial_detail_page(
        name,
        rating.unwrap_or_default(),
        Sections {
            rating: rating.is_some(),
            ..Sections::ALL
        },
    )
}

/// A detail page carrying only the `sections` asked for. The title is
/// always present.
pub fn partial_detail_page(name: &str, rating: &str, sections: Sections) -> String {
    let pick = |present: bool, html: String| if present { html } else { String::new() };

    let inline_list = pick(
        sections.inline_list,
        r#"<ul class="ipc-inline-list ipc-inline-list--show-dividers sc-d8941411-2 cdJsTz baseAlt">
          <li>1994</li><li>R</li><li>2h 22m</li>
        </ul>"#
            .to_owned(),
    );
    let rating = pick(
        sections.rating,
        format!(
            r#"<div data-testid="hero-rating-bar__aggregate-rating__score"><span>{rating}</span><span>/10</span></div>"#
        ),
    );
    let review_strip = pick(
        sections.review_strip,
        r#"<span class="three-Elements"><span class="score">1.2K</span><span class="label">User reviews</span></span>
        <span class="three-Elements"><span class="score">350</span><span class="label">Critic reviews</span></span>
        <span class="three-Elements"><span class="score">74</span><span class="label">Metascore</span></span>"#
            .to_owned(),
    );
    let storyline = pick(
        sections.storyline,
        r#"<div class="ipc-html-content-inner-div">Two men bond.</div>"#.to_owned(),
    );
    let credits = pick(
        sections.credits,
        r#"<ul class="ipc-metadata-list ipc-metadata-list--dividers-all title-pc-list ipc-metadata-list--baseAlt">
          <li class="ipc-metadata-list__item"><span>Director</span><a>Frank Darabont</a></li>
          <li class="ipc-metadata-list__item"><span>Writer</span><a>Stephen King</a></li>
          <li class="ipc-metadata-list__item"><a>Stars</a><a>Tim Robbins</a><a>Morgan Freeman</a></li>
        </ul>"#
            .to_owned(),
    );
    let details = pick(
        sections.details,
        r#"<section data-testid="Details"><ul>
          <li>Release date</li><li>October 14, 1994</li>
          <li>Country of origin</li><li>United States</li>
          <li>Official site</li><li>Warner Bros.</li>
          <li>Language</li><li>English</li>
        </ul></section>"#
            .to_owned(),
    );
    let box_office = pick(
        sections.box_office,
        r#"<section data-testid="BoxOffice"><ul>
          <li><span>Budget</span><ul><li>$25,000,000 (estimated)</li></ul></li>
        </ul></section>"#
            .to_owned(),
    );

    format!(
        r#"<html><body>
        <h1><span class="hero__primary-text">{name}</span></h1>
        {inline_list}
        {rating}
        {review_strip}
        {storyline}
        {credits}
        {details}
        {box_office}
        </body></html>"#
    )
}

/// A reviews page with `count` rated reviews.
pub fn reviews_page(count: usize) -> String {
    let reviews: String = (1..=count)
        .map(|i| {
            format!(
                r#"<div class="review-container"><span><span>{i}</span><span class="point-scale">/10</span></span><a class="title">Review {i}</a><div class="content">Body {i}</div></div>"#
            )
        })
        .collect();
    format!("<html><body>{reviews}</body></html>")
}

/// A listing page linking to each `(title, link)`.
pub fn listing_page(entries: &[(&str, &str)]) -> String {
    let items: String = entries
        .iter()
        .map(|(title, link)| {
            format!(
                r#"<li><a class="ipc-title-link-wrapper" href="{link}"><h3 class="ipc-title__text">{title}</h3></a></li>"#
            )
        })
        .collect();
    format!("<html><body><ul>{items}</ul></body></html>")
}
