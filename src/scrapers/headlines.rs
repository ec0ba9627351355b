//! Section page headline scraper.
//!
//! Downloads a news section page (for example
//! `https://www.nytimes.com/section/politics`) and pulls the text of the first
//! few heading elements in document order. Section pages list their stories
//! under `h2` tags on both supported outlets, so that is the default selector.

use crate::utils::normalize_whitespace;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use std::error::Error;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Returned when the page loaded but no heading carried any text.
pub const NO_ARTICLES_FOUND: &str = "No articles found.";

/// Knobs for [`HeadlineFetcher`].
#[derive(Debug, Clone)]
pub struct FetchSettings {
    /// Whole-request timeout.
    pub timeout: Duration,
    /// CSS selector for headline elements.
    pub selector: String,
    /// Maximum number of headline elements to read.
    pub limit: usize,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            selector: "h2".to_string(),
            limit: 5,
        }
    }
}

/// Fetches headlines from a single section page per call.
#[derive(Debug, Clone)]
pub struct HeadlineFetcher {
    client: Client,
    selector: Selector,
    limit: usize,
}

impl HeadlineFetcher {
    /// Build a fetcher. Fails only if the selector does not parse or the
    /// HTTP client cannot be constructed.
    pub fn new(settings: &FetchSettings) -> Result<Self, Box<dyn Error>> {
        let selector = Selector::parse(&settings.selector)
            .map_err(|e| format!("invalid headline selector {:?}: {e}", settings.selector))?;
        let client = Client::builder().timeout(settings.timeout).build()?;
        Ok(Self {
            client,
            selector,
            limit: settings.limit,
        })
    }

    /// Fetch up to `limit` headlines from `url`.
    ///
    /// Always returns at least one line. Failures come back in-band:
    ///
    /// - non-200 status: `"Failed to fetch articles. HTTP Status Code: <code>"`
    /// - transport or body errors: `"An error occurred: <error>"`
    /// - no usable headings: [`NO_ARTICLES_FOUND`]
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, url: &str) -> Vec<String> {
        let t0 = Instant::now();
        let response = match self.client.get(url).send().await {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "Headline request failed");
                return vec![format!("An error occurred: {e}")];
            }
        };

        let status = response.status();
        if status != StatusCode::OK {
            warn!(status = status.as_u16(), "Unexpected status for section page");
            return vec![format!(
                "Failed to fetch articles. HTTP Status Code: {}",
                status.as_u16()
            )];
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(error = %e, "Failed reading section page body");
                return vec![format!("An error occurred: {e}")];
            }
        };

        let headlines = extract_headlines(&body, &self.selector, self.limit);
        info!(
            count = headlines.len(),
            bytes = body.len(),
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Parsed section page"
        );
        debug!(?headlines, "Headlines");

        if headlines.is_empty() {
            vec![NO_ARTICLES_FOUND.to_string()]
        } else {
            headlines
        }
    }
}

/// Pull the text of the first `limit` elements matching `selector`.
///
/// Text is whitespace-normalized; elements whose text is empty are dropped
/// after the limit is applied, so the result may be shorter than `limit`.
pub fn extract_headlines(html: &str, selector: &Selector, limit: usize) -> Vec<String> {
    let document = Html::parse_document(html);
    document
        .select(selector)
        .take(limit)
        .map(|element| normalize_whitespace(&element.text().collect::<String>()))
        .filter(|text| !text.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn h2() -> Selector {
        Selector::parse("h2").unwrap()
    }

    fn page(headings: &[&str]) -> String {
        let body: String = headings
            .iter()
            .map(|h| format!("<article><h2>{h}</h2><p>teaser</p></article>"))
            .collect();
        format!("<html><head><title>Section</title></head><body>{body}</body></html>")
    }

    fn fetcher() -> HeadlineFetcher {
        HeadlineFetcher::new(&FetchSettings::default()).unwrap()
    }

    #[test]
    fn test_extract_takes_first_five_in_order() {
        let html = page(&["  One ", "Two", "Three", "Four", "Five", "Six", "Seven"]);
        let headlines = extract_headlines(&html, &h2(), 5);
        assert_eq!(headlines, vec!["One", "Two", "Three", "Four", "Five"]);
    }

    #[test]
    fn test_extract_nested_markup() {
        let html = r#"<h2><a href="/x"><span>City council</span>
            <span>passes budget</span></a></h2>"#;
        assert_eq!(
            extract_headlines(html, &h2(), 5),
            vec!["City council passes budget"]
        );
    }

    #[test]
    fn test_extract_drops_empty_after_limit() {
        let html = page(&["A", "   ", "C", "D", "E", "F"]);
        assert_eq!(extract_headlines(&html, &h2(), 5), vec!["A", "C", "D", "E"]);
    }

    #[test]
    fn test_extract_ignores_other_headings() {
        let html = "<h1>Masthead</h1><h3>Opinion</h3><h2>Story</h2>";
        assert_eq!(extract_headlines(html, &h2(), 5), vec!["Story"]);
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        let settings = FetchSettings {
            selector: "h2[".to_string(),
            ..FetchSettings::default()
        };
        assert!(HeadlineFetcher::new(&settings).is_err());
    }

    #[tokio::test]
    async fn test_fetch_seven_headings_returns_five() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/section/politics")
            .with_status(200)
            .with_header("content-type", "text/html")
            .with_body(page(&[" A ", "B", "C", "D", "E", "F", "G"]))
            .create_async()
            .await;

        let url = format!("{}/section/politics", server.url());
        let headlines = fetcher().fetch(&url).await;

        mock.assert_async().await;
        assert_eq!(headlines, vec!["A", "B", "C", "D", "E"]);
    }

    #[tokio::test]
    async fn test_fetch_404_returns_status_line() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .create_async()
            .await;

        let headlines = fetcher().fetch(&format!("{}/missing", server.url())).await;
        assert_eq!(headlines.len(), 1);
        assert!(headlines[0].contains("404"));
        assert_eq!(headlines[0], "Failed to fetch articles. HTTP Status Code: 404");
    }

    #[tokio::test]
    async fn test_fetch_no_headings_returns_placeholder() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/empty")
            .with_status(200)
            .with_body("<html><body><h1>Only a masthead</h1></body></html>")
            .create_async()
            .await;

        let headlines = fetcher().fetch(&format!("{}/empty", server.url())).await;
        assert_eq!(headlines, vec![NO_ARTICLES_FOUND.to_string()]);
    }

    #[tokio::test]
    async fn test_fetch_connection_error_is_in_band() {
        // Nothing listens on the discard port.
        let headlines = fetcher().fetch("http://127.0.0.1:9/section").await;
        assert_eq!(headlines.len(), 1);
        assert!(headlines[0].starts_with("An error occurred: "));
    }

    #[tokio::test]
    async fn test_fetch_invalid_url_is_in_band() {
        let headlines = fetcher().fetch("not a url").await;
        assert_eq!(headlines.len(), 1);
        assert!(headlines[0].starts_with("An error occurred: "));
    }

    #[tokio::test]
    async fn test_fetch_respects_custom_limit() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/")
            .with_status(200)
            .with_body(page(&["A", "B", "C"]))
            .create_async()
            .await;

        let settings = FetchSettings {
            limit: 2,
            ..FetchSettings::default()
        };
        let fetcher = HeadlineFetcher::new(&settings).unwrap();
        assert_eq!(fetcher.fetch(&format!("{}/", server.url())).await, vec!["A", "B"]);
    }
}
