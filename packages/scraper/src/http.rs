//! HTTP implementation of [`Fetch`].
//!
//! Requests carry a fixed browser header set so the source site serves the
//! same markup a desktop browser would get. Every request passes through a
//! shared [`Throttle`] and is retried per the configured [`RetryPolicy`].

use std::time::Duration;

use reqwest::header::{self, HeaderMap, HeaderValue};

use crate::retry::{self, RetryPolicy};
use crate::throttle::Throttle;
use crate::{Document, Fetch, FetchError};

/// Charset used when the response does not declare one.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Desktop Chrome user agent sent with every request.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Default `Accept-Language` header.
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.5";

/// Settings for building an [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct FetcherOptions {
    /// `User-Agent` header value.
    pub user_agent: String,
    /// `Accept-Language` header value.
    pub accept_language: String,
    /// Per-request timeout; expiry is reported as a transport failure.
    pub timeout: Duration,
    /// Minimum spacing between request starts.
    pub request_delay: Duration,
    /// Retry behaviour for transient failures.
    pub retry: RetryPolicy,
}

impl Default for FetcherOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_owned(),
            timeout: Duration::from_secs(15),
            request_delay: Duration::from_millis(200),
            retry: RetryPolicy::default(),
        }
    }
}

impl FetcherOptions {
    /// The browser header set sent with every request.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] if a configured value is not a valid
    /// header value.
    pub fn headers(&self) -> Result<HeaderMap, FetchError> {
        let pairs = [
            (header::USER_AGENT, self.user_agent.as_str()),
            (header::ACCEPT_LANGUAGE, self.accept_language.as_str()),
            (header::ACCEPT_ENCODING, "gzip, deflate, br"),
            (header::CONNECTION, "keep-alive"),
            (header::UPGRADE_INSECURE_REQUESTS, "1"),
        ];

        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(name, header_value(value)?);
        }
        Ok(map)
    }
}

fn header_value(value: &str) -> Result<HeaderValue, FetchError> {
    HeaderValue::from_str(value)
        .map_err(|e| FetchError::Parse(format!("invalid header value '{value}': {e}")))
}

/// Extracts the `charset` parameter from a `Content-Type` header value.
///
/// Parameter names are matched case-insensitively and surrounding quotes are
/// removed. Returns `None` when no charset is declared.
#[must_use]
pub fn charset_from_content_type(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_ascii_lowercase())
    })
}

/// Fetches documents over HTTP with browser headers, throttling and retry.
#[derive(Debug)]
pub struct HttpFetcher {
    client: reqwest::Client,
    throttle: Throttle,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Builds a fetcher from `options`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Parse`] if the headers are invalid or the client
    /// cannot be constructed.
    pub fn new(options: &FetcherOptions) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .default_headers(options.headers()?)
            .timeout(options.timeout)
            .build()
            .map_err(|e| FetchError::Parse(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            throttle: Throttle::new(options.request_delay),
            retry: options.retry,
        })
    }

    /// One throttled GET, no retry.
    async fn fetch_once(&self, url: &str) -> Result<Document, FetchError> {
        self.throttle.wait().await;
        log::debug!("GET {url}");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus {
                url: url.to_owned(),
                code: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_owned(),
            });
        }

        let charset = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(charset_from_content_type)
            .unwrap_or_else(|| DEFAULT_CHARSET.to_owned());
        log::debug!("{url}: decoding body as {charset}");

        let body = response
            .text_with_charset(&charset)
            .await
            .map_err(|e| FetchError::transport(url, &e))?;

        Ok(Document::parse(url, &body))
    }
}

impl Fetch for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, FetchError> {
        let result = retry::with_backoff(self.retry, url, || self.fetch_once(url)).await;
        if let Err(e) = &result {
            match e {
                FetchError::HttpStatus { code, reason, .. } => {
                    log::warn!("HTTP error for {url}: code {code}, reason {reason}");
                }
                FetchError::Transport { message, .. } => {
                    log::warn!("request error for {url}: {message}");
                }
                FetchError::Parse(message) => log::warn!("{url}: {message}"),
            }
        }
        result
    }
}
