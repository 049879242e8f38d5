//! `None`-tolerant element lookup and text helpers.
//!
//! Every extractor chains lookups through containers that may be missing,
//! so each helper accepts an `Option<ElementRef>` and returns `None` or an
//! empty result when given `None`.
//!
//! ```ignore
//! let details = find_first(Some(doc.root()), &Query::tag("section").attr("data-testid", "Details"));
//! let items = find_all(details, &Query::tag("li"));
//! ```

use scraper::{ElementRef, Selector};

/// An attribute constraint on a [`Query`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrFilter {
    /// The element carries this class (among possibly others).
    Class(String),
    /// The attribute is present with exactly this value.
    Equals(String, String),
    /// The attribute is present with any value.
    Present(String),
}

/// A tag name plus attribute filters, compiled to a CSS selector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    tag: String,
    filters: Vec<AttrFilter>,
}

impl Query {
    /// Matches elements with the given tag name.
    #[must_use]
    pub fn tag(tag: &str) -> Self {
        Self {
            tag: tag.to_owned(),
            filters: Vec::new(),
        }
    }

    /// Requires every whitespace-separated class in `classes`.
    #[must_use]
    pub fn class(mut self, classes: &str) -> Self {
        self.filters.extend(
            classes
                .split_whitespace()
                .map(|class| AttrFilter::Class(class.to_owned())),
        );
        self
    }

    /// Requires `name="value"`.
    #[must_use]
    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.filters
            .push(AttrFilter::Equals(name.to_owned(), value.to_owned()));
        self
    }

    /// Requires the attribute to be present.
    #[must_use]
    pub fn has_attr(mut self, name: &str) -> Self {
        self.filters.push(AttrFilter::Present(name.to_owned()));
        self
    }

    /// The CSS selector text this query compiles to.
    #[must_use]
    pub fn css(&self) -> String {
        let mut css = self.tag.clone();
        for filter in &self.filters {
            match filter {
                AttrFilter::Class(class) => {
                    css.push('.');
                    css.push_str(class);
                }
                AttrFilter::Equals(name, value) => {
                    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                    css.push_str(&format!("[{name}=\"{escaped}\"]"));
                }
                AttrFilter::Present(name) => {
                    css.push_str(&format!("[{name}]"));
                }
            }
        }
        css
    }

    /// Parses [`Self::css`] into a [`Selector`], logging and returning `None`
    /// if it is not valid CSS.
    #[must_use]
    pub fn selector(&self) -> Option<Selector> {
        let css = self.css();
        match Selector::parse(&css) {
            Ok(selector) => Some(selector),
            Err(e) => {
                log::warn!("invalid CSS selector '{css}': {e}");
                None
            }
        }
    }
}

/// Returns the first descendant of `node` matching `query`, in document
/// order. The node itself is never a match.
#[must_use]
pub fn find_first<'a>(node: Option<ElementRef<'a>>, query: &Query) -> Option<ElementRef<'a>> {
    let node = node?;
    let selector = query.selector()?;
    node.select(&selector).find(|el| el.id() != node.id())
}

/// Returns every descendant of `node` matching `query`, in document order.
#[must_use]
pub fn find_all<'a>(node: Option<ElementRef<'a>>, query: &Query) -> Vec<ElementRef<'a>> {
    let Some(node) = node else {
        return Vec::new();
    };
    let Some(selector) = query.selector() else {
        return Vec::new();
    };
    node.select(&selector)
        .filter(|el| el.id() != node.id())
        .collect()
}

/// Every descendant text run, unmodified.
#[must_use]
pub fn strings(node: Option<ElementRef<'_>>) -> Vec<String> {
    node.map(|el| el.text().map(str::to_owned).collect())
        .unwrap_or_default()
}

/// Descendant text runs, each trimmed, empty runs dropped.
#[must_use]
pub fn stripped_strings(node: Option<ElementRef<'_>>) -> Vec<String> {
    node.map(|el| {
        el.text()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .collect()
    })
    .unwrap_or_default()
}

/// Stripped strings joined with single spaces.
#[must_use]
pub fn collapsed_text(node: Option<ElementRef<'_>>) -> String {
    stripped_strings(node).join(" ")
}

/// Descendant text concatenated verbatim.
#[must_use]
pub fn raw_text(node: Option<ElementRef<'_>>) -> String {
    node.map(|el| el.text().collect()).unwrap_or_default()
}

/// The value of attribute `name`, if the node exists and carries it.
#[must_use]
pub fn attr<'a>(node: Option<ElementRef<'a>>, name: &str) -> Option<&'a str> {
    node?.value().attr(name)
}

/// The nearest preceding sibling element with tag `tag`.
#[must_use]
pub fn previous_sibling<'a>(node: Option<ElementRef<'a>>, tag: &str) -> Option<ElementRef<'a>> {
    node?
        .prev_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == tag)
}
