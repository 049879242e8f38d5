#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Document fetching and selector utilities.
//!
//! Provides the [`Fetch`] trait and its HTTP implementation
//! ([`http::HttpFetcher`]), the parsed [`Document`] type every extractor
//! works on, and the `None`-tolerant lookup helpers in [`select`].
//!
//! This crate knows nothing about movies. It turns URLs into traversable
//! documents and reports failures as typed [`FetchError`]s.

pub mod http;
pub mod retry;
pub mod select;
pub mod throttle;

use scraper::{ElementRef, Html};

/// Errors that can occur while fetching a document.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// The server answered with a non-2xx status.
    #[error("HTTP {code} {reason} for {url}")]
    HttpStatus {
        /// The requested URL.
        url: String,
        /// Numeric status code.
        code: u16,
        /// Canonical reason phrase for the status.
        reason: String,
    },

    /// The request never produced a response (DNS, connect, timeout, reset)
    /// or the body could not be read.
    #[error("transport error for {url}: {message}")]
    Transport {
        /// The requested URL.
        url: String,
        /// Description of the underlying failure.
        message: String,
    },

    /// The client could not be configured (invalid header name or value).
    #[error("invalid request configuration: {0}")]
    Parse(String),
}

impl FetchError {
    /// Builds a [`FetchError::Transport`] from a `reqwest` error.
    #[must_use]
    pub fn transport(url: &str, error: &reqwest::Error) -> Self {
        Self::Transport {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }

    /// Returns `true` for failures worth retrying: server errors and
    /// transport failures. Client errors (4xx) are terminal.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::HttpStatus { code, .. } => *code >= 500,
            Self::Transport { .. } => true,
            Self::Parse(_) => false,
        }
    }
}

/// A parsed HTML page together with the URL it was fetched from.
pub struct Document {
    url: String,
    html: Html,
}

impl Document {
    /// Parses `body` as a full HTML document.
    #[must_use]
    pub fn parse(url: impl Into<String>, body: &str) -> Self {
        Self {
            url: url.into(),
            html: Html::parse_document(body),
        }
    }

    /// The URL this document was fetched from.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The `<html>` element, the starting point for every lookup.
    #[must_use]
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// The underlying parsed tree.
    #[must_use]
    pub const fn html(&self) -> &Html {
        &self.html
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document").field("url", &self.url).finish_non_exhaustive()
    }
}

/// Source of parsed documents.
///
/// The production implementation is [`http::HttpFetcher`]; tests drive the
/// pipeline with in-memory fixtures instead. The returned future is not
/// required to be `Send` because [`Document`] holds a non-`Send` parse tree.
pub trait Fetch {
    /// Fetches `url` and parses the response body.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::HttpStatus`] on a non-2xx response and
    /// [`FetchError::Transport`] when no usable response arrived.
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<Document, FetchError>>;
}

impl<T: Fetch + ?Sized> Fetch for &T {
    fn fetch(&self, url: &str) -> impl std::future::Future<Output = Result<Document, FetchError>> {
        (**self).fetch(url)
    }
}
