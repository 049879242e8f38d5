//! URL construction and detail-link parsing.
//!
//! Detail links on listing pages are site-relative (`/title/tt0111161/?ref_=sr_t_1`).
//! The movie id is the path segment after `title`; the reviews and image
//! pages are addressed by that id.

/// Site root used when no override is configured.
pub const DEFAULT_BASE_URL: &str = "https://www.imdb.com";

/// Listing page for feature films in `genre`.
#[must_use]
pub fn listing_url(base_url: &str, genre: &str) -> String {
    format!(
        "{}/search/title/?genres={}&title_type=feature",
        base_url.trim_end_matches('/'),
        genre.trim()
    )
}

/// Absolute URL for a detail link. Absolute links are returned unchanged.
#[must_use]
pub fn detail_url(base_url: &str, detail_link: &str) -> String {
    if detail_link.starts_with("http://") || detail_link.starts_with("https://") {
        detail_link.to_owned()
    } else {
        format!("{}{detail_link}", base_url.trim_end_matches('/'))
    }
}

/// The movie id embedded in a detail link: the third `/`-separated segment
/// of `/title/{id}/...`, with any query string removed.
///
/// Returns `None` when the segment is missing or empty.
#[must_use]
pub fn imdb_id_from_link(detail_link: &str) -> Option<&str> {
    let path = detail_link
        .strip_prefix("https://")
        .or_else(|| detail_link.strip_prefix("http://"))
        .map_or(detail_link, |rest| rest.find('/').map_or("", |i| &rest[i..]));

    let segment = path.split('/').nth(2)?;
    let id = segment.split(['?', '#']).next().unwrap_or_default();
    (!id.is_empty()).then_some(id)
}

/// Curated user-reviews page for a movie id, spoilers hidden.
#[must_use]
pub fn reviews_url(base_url: &str, imdb_id: &str) -> String {
    format!(
        "{}/title/{imdb_id}/reviews?spoiler=hide&sort=curated&dir=desc&ratingFilter=0",
        base_url.trim_end_matches('/')
    )
}

/// Media-viewer page used to look up a movie's poster.
#[must_use]
pub fn image_page_url(base_url: &str, imdb_id: &str) -> String {
    format!(
        "{}/title/{imdb_id}/mediaviewer/",
        base_url.trim_end_matches('/')
    )
}
