use std::borrow::Cow;
use std::time::Instant;

use once_cell::sync::Lazy;
use reqwest::{Client, ClientBuilder, redirect};
use scraper::{ElementRef, Html, Node, Selector};
use tracing::debug;

use crate::config::FetchSettings;
use crate::error::{AppError, Result};

const USER_AGENT: &str = concat!("page-digest/", env!("CARGO_PKG_VERSION"));

// Create static selectors to avoid recompiling them each time
static BODY_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("body").expect("Failed to parse body selector")
});

/// Elements whose contents never render as page text.
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Retrieves raw documents. One client is shared by every worker so
/// connections are pooled across pages.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    settings: FetchSettings,
}

impl Fetcher {
    pub fn new(settings: FetchSettings) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(settings.timeout)
            .connect_timeout(settings.connect_timeout)
            .pool_max_idle_per_host(10)
            .redirect(redirect::Policy::limited(10))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, settings })
    }

    /// Performs a single GET against `url` after scheme normalization. The
    /// configured timeout bounds this call alone.
    pub async fn fetch(&self, url: &str) -> Result<String> {
        let url = normalize_url(url);
        let start = Instant::now();

        let response = self
            .client
            .get(&*url)
            .send()
            .await
            .map_err(|e| self.fetch_error(&url, e))?;

        // Error pages are analyzed like any other body.
        let status = response.status();
        let html = response.text().await.map_err(|e| self.fetch_error(&url, e))?;
        debug!(
            url = %url,
            status = status.as_u16(),
            bytes = html.len(),
            elapsed = ?start.elapsed(),
            "fetched page"
        );
        Ok(html)
    }

    fn fetch_error(&self, url: &str, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::FetchError(format!(
                "{}: timed out after {:?}",
                url, self.settings.timeout
            ))
        } else {
            AppError::FetchError(format!("{}: {}", url, err))
        }
    }
}

/// Prepends `https://` to addresses that carry no http(s) scheme.
pub fn normalize_url(url: &str) -> Cow<'_, str> {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Cow::Borrowed(url)
    } else {
        Cow::Owned(format!("https://{}", url))
    }
}

/// Extracts the text of the document body.
///
/// Leaf elements contribute their whole text content and text runs mixed
/// in with sibling elements contribute themselves, each followed by one
/// space, in document order. The result is not trimmed; an empty body
/// yields an empty string.
pub fn extract_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);

    let body = document
        .select(&BODY_SELECTOR)
        .next()
        .ok_or_else(|| AppError::ParseError("No <body> tag found in the HTML".to_string()))?;

    let mut text = String::with_capacity(html.len() / 2);
    let mut stack: Vec<_> = body.children().collect();
    stack.reverse();

    while let Some(node) = stack.pop() {
        match node.value() {
            Node::Text(run) => {
                if !run.trim().is_empty() {
                    text.push_str(run);
                    text.push(' ');
                }
            }
            Node::Element(element) => {
                if HIDDEN_ELEMENTS.contains(&element.name()) {
                    continue;
                }
                if node.children().any(|child| child.value().is_element()) {
                    stack.extend(node.children().rev());
                } else if let Some(leaf) = ElementRef::wrap(node) {
                    text.extend(leaf.text());
                    text.push(' ');
                }
            }
            _ => {}
        }
    }

    Ok(text)
}
