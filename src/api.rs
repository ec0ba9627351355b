//! Summarization backend: the LLM client and its optional retry decorator.
//!
//! # Architecture
//!
//! - [`SummarizeAsync`]: core trait, one text plus length bounds in, one summary out
//! - [`AwfulSummarizer`]: calls an OpenAI-compatible API through `awful_aj`
//! - [`RetrySummarize`]: decorator adding exponential backoff to any backend
//!
//! # Retry Strategy
//!
//! Retries are off unless `max_retries > 0`. When enabled:
//! - Exponential backoff starting at `base_delay`
//! - Maximum delay capped at 30 seconds
//! - Random jitter (0-250ms) added to every delay

use crate::utils::{clamp_words, truncate_for_log};
use awful_aj::api::ask;
use awful_aj::{config::AwfulJadeConfig, template::ChatTemplate};
use rand::{Rng, rng};
use std::error::Error;
use std::fmt;
use std::time::{Duration as StdDuration, Instant};
use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

/// Length bounds passed to every summarization call, in words.
///
/// The maximum is enforced on the model's answer; the minimum is only asked
/// for in the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryBounds {
    /// Longest acceptable summary. Longer answers are cut to this many words.
    pub max_length: usize,
    /// Shortest summary the model is asked to produce.
    pub min_length: usize,
}

impl Default for SummaryBounds {
    fn default() -> Self {
        Self {
            max_length: 50,
            min_length: 10,
        }
    }
}

impl SummaryBounds {
    /// Create validated bounds.
    ///
    /// # Arguments
    ///
    /// * `min_length` - Shortest summary to ask for, in words
    /// * `max_length` - Longest summary to accept, in words
    ///
    /// # Errors
    ///
    /// Returns an error if `max_length` is zero or `min_length` exceeds it.
    pub fn new(min_length: usize, max_length: usize) -> Result<Self, Box<dyn Error>> {
        if max_length == 0 {
            return Err("max summary length must be at least 1".into());
        }
        if min_length > max_length {
            return Err(format!(
                "min summary length ({min_length}) exceeds max summary length ({max_length})"
            )
            .into());
        }
        Ok(Self {
            max_length,
            min_length,
        })
    }
}

/// A backend that turns one piece of text into one summary.
///
/// Implementors include the real LLM client, decorators like
/// [`RetrySummarize`], and test doubles.
pub trait SummarizeAsync {
    /// Summarize `text` within `bounds`.
    ///
    /// # Returns
    ///
    /// The summary text, or an error if the backend could not produce one.
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, Box<dyn Error>>;
}

/// Build the user message sent to the model for one headline.
pub fn summary_prompt(text: &str, bounds: SummaryBounds) -> String {
    format!(
        "Summarize the following news headline in at least {} and at most {} words. \
         Reply with the summary only.\n\n{}",
        bounds.min_length, bounds.max_length, text
    )
}

/// Clean up a raw model answer: trim, strip wrapping quotes, clamp to the
/// maximum length. An empty answer is an error.
pub fn finish_summary(raw: &str, bounds: SummaryBounds) -> Result<String, Box<dyn Error>> {
    let trimmed = raw.trim().trim_matches('"').trim();
    let summary = clamp_words(trimmed, bounds.max_length);
    if summary.is_empty() {
        return Err("model returned an empty summary".into());
    }
    Ok(summary)
}

/// Check that an `awful_aj` config file pins decoding to greedy sampling.
///
/// Summaries are meant to be deterministic, and the model client takes its
/// sampling settings from the config file, so the raw YAML is inspected for a
/// top-level `temperature` key.
///
/// # Returns
///
/// `None` when `temperature` is `0`, otherwise a message describing why the
/// output may vary between runs. Unparseable YAML yields `None`; loading the
/// config reports that error instead.
pub fn sampling_warning(config_yaml: &str) -> Option<String> {
    let value: serde_yaml::Value = serde_yaml::from_str(config_yaml).ok()?;
    match value.get("temperature") {
        None | Some(serde_yaml::Value::Null) => Some(
            "config does not set `temperature`; the server default may sample".to_string(),
        ),
        Some(t) => match t.as_f64() {
            Some(t) if t == 0.0 => None,
            Some(t) => Some(format!("config sets `temperature: {t}`, which samples")),
            None => Some(format!("config `temperature` is not a number: {t:?}")),
        },
    }
}

/// Wrapper that adds exponential backoff retry logic to any [`SummarizeAsync`]
/// implementation.
///
/// ```text
/// delay = min(base_delay * 2^(attempt-1), max_delay) + random_jitter(0..250ms)
/// ```
pub struct RetrySummarize<T> {
    /// The underlying backend to wrap.
    inner: T,
    /// Maximum number of retry attempts before giving up; `0` disables retrying.
    max_retries: usize,
    /// Initial delay between retries (doubles with each attempt).
    base_delay: StdDuration,
    /// Maximum delay cap.
    max_delay: StdDuration,
}

impl<T> RetrySummarize<T>
where
    T: SummarizeAsync,
{
    /// Create a new retry wrapper around an existing [`SummarizeAsync`] implementation.
    ///
    /// # Arguments
    ///
    /// * `inner` - The backend to wrap
    /// * `max_retries` - Maximum number of retry attempts (`0` for none)
    /// * `base_delay` - Initial delay between retries
    ///
    /// # Example
    ///
    /// ```ignore
    /// let backend = AwfulSummarizer::new(config, template);
    /// let retrying = RetrySummarize::new(backend, 3, Duration::from_secs(1));
    /// ```
    pub fn new(inner: T, max_retries: usize, base_delay: StdDuration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: StdDuration::from_secs(30),
        }
    }

    fn backoff(&self, attempt: usize) -> StdDuration {
        let shift = (attempt - 1).min(16) as u32;
        let delay = self.base_delay.saturating_mul(1u32 << shift).min(self.max_delay);
        let jitter_ms: u64 = rng().random_range(0..=250);
        delay + StdDuration::from_millis(jitter_ms)
    }
}

impl<T> fmt::Debug for RetrySummarize<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetrySummarize")
            .field("max_retries", &self.max_retries)
            .field("base_delay", &self.base_delay)
            .field("max_delay", &self.max_delay)
            .finish()
    }
}

impl<T> SummarizeAsync for RetrySummarize<T>
where
    T: SummarizeAsync,
{
    #[instrument(level = "info", skip_all)]
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, Box<dyn Error>> {
        let total_t0 = Instant::now();
        let mut attempt = 0usize;

        loop {
            let attempt_t0 = Instant::now();
            match self.inner.summarize(text, bounds).await {
                Ok(summary) => return Ok(summary),
                Err(e) => {
                    attempt += 1;
                    let attempt_dt = attempt_t0.elapsed();
                    let total_dt = total_t0.elapsed();

                    if attempt > self.max_retries {
                        if self.max_retries > 0 {
                            error!(
                                attempt,
                                max = self.max_retries,
                                elapsed_ms_total = total_dt.as_millis() as u128,
                                error = %e,
                                "summarize() exhausted retries"
                            );
                        }
                        return Err(e);
                    }

                    let delay = self.backoff(attempt);
                    warn!(
                        attempt,
                        max = self.max_retries,
                        elapsed_ms_attempt = attempt_dt.as_millis() as u128,
                        ?delay,
                        error = %e,
                        "summarize() attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}

/// Summarizer backed by `awful_aj::api::ask`.
///
/// Owns the loaded configuration (endpoint, model, sampling settings) and the
/// chat template holding the system prompt. Both are loaded once at startup.
#[derive(Debug)]
pub struct AwfulSummarizer {
    /// LLM configuration (API key, endpoint, model, sampling settings).
    config: AwfulJadeConfig,
    /// Chat template holding the system prompt for headline summaries.
    template: ChatTemplate,
}

impl AwfulSummarizer {
    /// Wrap an already loaded configuration and template.
    pub fn new(config: AwfulJadeConfig, template: ChatTemplate) -> Self {
        Self { config, template }
    }
}

impl SummarizeAsync for AwfulSummarizer {
    #[instrument(level = "info", skip_all)]
    async fn summarize(
        &self,
        text: &str,
        bounds: SummaryBounds,
    ) -> Result<String, Box<dyn Error>> {
        let t0 = Instant::now();
        let prompt = summary_prompt(text, bounds);
        let res = ask(&self.config, prompt, &self.template, None, None).await;
        let dt = t0.elapsed();

        match res {
            Ok(raw) => {
                debug!(
                    elapsed_ms = dt.as_millis() as u128,
                    response_preview = %truncate_for_log(&raw, 200),
                    "API call succeeded"
                );
                finish_summary(&raw, bounds)
            }
            Err(e) => {
                warn!(elapsed_ms = dt.as_millis() as u128, error = %e, "API call failed");
                Err(e)
            }
        }
    }
}
