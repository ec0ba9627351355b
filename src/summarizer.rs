//! Per-headline summarization with failure isolation.
//!
//! [`HeadlineSummarizer`] runs the injected backend once per headline, one at
//! a time, and always returns exactly one line per input. A failed call yields
//! [`COULD_NOT_SUMMARIZE`] at that position and the loop moves on.

use crate::api::{SummarizeAsync, SummaryBounds};
use futures::stream::{self, StreamExt};
use std::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Placeholder for a headline the backend failed on.
pub const COULD_NOT_SUMMARIZE: &str = "Could not summarize this article.";

/// Summarizes a list of headlines one at a time through an injected backend.
///
/// The backend is supplied at construction, so the real LLM client and test
/// doubles are interchangeable.
#[derive(Debug)]
pub struct HeadlineSummarizer<T> {
    /// The model client, possibly wrapped in a retry decorator.
    backend: T,
    /// Length bounds passed on every call.
    bounds: SummaryBounds,
}

impl<T> HeadlineSummarizer<T>
where
    T: SummarizeAsync,
{
    /// Create a summarizer around `backend` using `bounds` for every call.
    pub fn new(backend: T, bounds: SummaryBounds) -> Self {
        Self { backend, bounds }
    }

    /// Summarize every headline in order. `result[i]` belongs to `headlines[i]`.
    ///
    /// # Returns
    ///
    /// Exactly `headlines.len()` lines; failed items hold [`COULD_NOT_SUMMARIZE`].
    #[instrument(level = "info", skip_all, fields(count = headlines.len()))]
    pub async fn summarize_all(&self, headlines: &[String]) -> Vec<String> {
        let t0 = Instant::now();
        let summaries: Vec<String> = stream::iter(headlines.iter().enumerate())
            .then(|(index, headline)| async move {
                match self.backend.summarize(headline, self.bounds).await {
                    Ok(summary) => {
                        debug!(index, "Summarized headline");
                        summary
                    }
                    Err(e) => {
                        warn!(index, error = %e, "Summarization failed; using placeholder");
                        COULD_NOT_SUMMARIZE.to_string()
                    }
                }
            })
            .collect()
            .await;

        let failed = summaries
            .iter()
            .filter(|s| s.as_str() == COULD_NOT_SUMMARIZE)
            .count();
        info!(
            total = summaries.len(),
            failed,
            elapsed_ms = t0.elapsed().as_millis() as u128,
            "Summarized headlines"
        );
        summaries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use std::sync::Mutex;

    /// Records every call; fails on the listed call indexes.
    #[derive(Default)]
    struct Scripted {
        fail_on: Vec<usize>,
        seen: Mutex<Vec<(String, SummaryBounds)>>,
    }

    impl SummarizeAsync for Scripted {
        async fn summarize(
            &self,
            text: &str,
            bounds: SummaryBounds,
        ) -> Result<String, Box<dyn Error>> {
            let mut seen = self.seen.lock().unwrap();
            let index = seen.len();
            seen.push((text.to_string(), bounds));
            if self.fail_on.contains(&index) {
                Err("model exploded".into())
            } else {
                Ok(format!("short: {text}"))
            }
        }
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_empty_input_gives_empty_output() {
        let summarizer = HeadlineSummarizer::new(Scripted::default(), SummaryBounds::default());
        assert!(summarizer.summarize_all(&[]).await.is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_isolated_to_its_position() {
        let backend = Scripted {
            fail_on: vec![1],
            ..Scripted::default()
        };
        let summarizer = HeadlineSummarizer::new(backend, SummaryBounds::default());
        let summaries = summarizer.summarize_all(&lines(&["A", "B", "C"])).await;

        assert_eq!(
            summaries,
            vec!["short: A", COULD_NOT_SUMMARIZE, "short: C"]
        );
    }

    #[tokio::test]
    async fn test_every_failure_still_keeps_length() {
        let backend = Scripted {
            fail_on: vec![0, 1, 2, 3],
            ..Scripted::default()
        };
        let summarizer = HeadlineSummarizer::new(backend, SummaryBounds::default());
        let summaries = summarizer.summarize_all(&lines(&["A", "B", "C", "D"])).await;
        assert_eq!(summaries.len(), 4);
        assert!(summaries.iter().all(|s| s == COULD_NOT_SUMMARIZE));
    }

    #[tokio::test]
    async fn test_calls_in_order_with_configured_bounds() {
        let bounds = SummaryBounds::new(3, 12).unwrap();
        let summarizer = HeadlineSummarizer::new(Scripted::default(), bounds);
        summarizer.summarize_all(&lines(&["first", "second"])).await;

        let seen = summarizer.backend.seen.lock().unwrap();
        assert_eq!(
            *seen,
            vec![("first".to_string(), bounds), ("second".to_string(), bounds)]
        );
    }
}
