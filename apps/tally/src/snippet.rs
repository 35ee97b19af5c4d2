//! # Page Snippets
//!
//! Fetch a page, parse it, and pull out the text of the first element
//! matching a CSS selector.
//!
//! ```text
//! PageFetcher::fetch(url) ──► FetchedPage { body, content_type }
//!          │ None                          │
//!          ▼                               ▼
//!   SnippetError::NoData        extract_snippet(page, selector)
//!                                          │ scraper::Html + Selector
//!                                          ▼
//!                               first match ──► text, trimmed
//!                                          │ no match
//!                                          ▼
//!                               SnippetError::NoMatch
//! ```
//!
//! HTML parsing and selector matching belong to `scraper`; nothing here
//! looks inside the markup itself.

use std::future::Future;
use std::time::Duration;

use encoding_rs::{Encoding, UTF_8};
use mime::Mime;
use scraper::{Html, Selector};
use thiserror::Error;
use tracing::{debug, warn};

/// Failures while fetching a snippet. Each is terminal for that fetch.
#[derive(Debug, Error)]
pub enum SnippetError {
    /// The network gave back nothing usable.
    #[error("Couldn't load the page.")]
    NoData,

    /// The page loaded but nothing matched the selector.
    #[error("Couldn't find that element on the page.")]
    NoMatch,

    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The HTTP client couldn't be built.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Raw response: the bytes plus the Content-Type header, if any.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub body: Vec<u8>,
    pub content_type: Option<String>,
}

/// Network fetch. `Ok(None)` means the request produced no data.
pub trait PageFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<FetchedPage>> + Send;
}

// =============================================================================
// HTTP Fetcher
// =============================================================================

/// `PageFetcher` backed by reqwest.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration, user_agent: &str) -> Result<Self, SnippetError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(HttpFetcher { client })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Option<FetchedPage>> + Send {
        async move {
            let response = match self.client.get(url).send().await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url = %url, error = %e, "Request failed");
                    return None;
                }
            };

            debug!(url = %url, status = %response.status(), "Response received");
            let content_type = response
                .headers()
                .get(reqwest::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);

            match response.bytes().await {
                Ok(body) if !body.is_empty() => Some(FetchedPage {
                    body: body.to_vec(),
                    content_type,
                }),
                Ok(_) => None,
                Err(e) => {
                    warn!(url = %url, error = %e, "Reading body failed");
                    None
                }
            }
        }
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Fetches `url` and extracts the snippet at `selector`.
pub async fn fetch_snippet<F: PageFetcher>(
    fetcher: &F,
    url: &str,
    selector: &str,
) -> Result<String, SnippetError> {
    let page = fetcher.fetch(url).await.ok_or(SnippetError::NoData)?;
    extract_snippet(&page, selector)
}

/// Text content of the first node matching `selector`, whitespace-trimmed.
pub fn extract_snippet(page: &FetchedPage, selector: &str) -> Result<String, SnippetError> {
    let parsed = Selector::parse(selector).map_err(|e| SnippetError::InvalidSelector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })?;

    let document = Html::parse_document(&decode_body(page));
    let node = document
        .select(&parsed)
        .next()
        .ok_or(SnippetError::NoMatch)?;

    Ok(node.text().collect::<String>().trim().to_string())
}

/// Decodes the body with the encoding named by the Content-Type charset.
///
/// No header, no charset parameter, or a label `encoding_rs` doesn't know
/// all mean UTF-8. Malformed sequences become U+FFFD.
fn decode_body(page: &FetchedPage) -> String {
    let encoding = page
        .content_type
        .as_deref()
        .and_then(encoding_for)
        .unwrap_or(UTF_8);

    let (text, used, had_errors) = encoding.decode(&page.body);
    if had_errors {
        debug!(encoding = used.name(), "Body had malformed sequences");
    }
    text.into_owned()
}

/// The encoding for the `charset` parameter of a Content-Type value.
fn encoding_for(content_type: &str) -> Option<&'static Encoding> {
    let parsed: Mime = content_type.parse().ok()?;
    let charset = parsed.get_param(mime::CHARSET)?;
    let encoding = Encoding::for_label(charset.as_str().as_bytes());
    if encoding.is_none() {
        debug!(charset = %charset, "Unknown charset, decoding as UTF-8");
    }
    encoding
}
