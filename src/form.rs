//! The news form: pick a location and a genre, fetch, optionally summarize.
//!
//! [`Session`] holds read-only handles to the source table, the fetcher and
//! the summarizer. Each fetch builds a fresh [`NewsReport`]; nothing is kept
//! between actions.
//!
//! Terminal interaction goes through the [`Prompter`] trait:
//! - [`TerminalPrompter`]: `dialoguer` menus and confirmations on the terminal
//! - scripted implementations in tests, the same way [`SummarizeAsync`] is mocked

use crate::api::SummarizeAsync;
use crate::models::NewsReport;
use crate::outputs::json::write_report;
use crate::outputs::text::{NO_SOURCES, render_headlines, render_summaries};
use crate::scrapers::headlines::HeadlineFetcher;
use crate::sources::{Genre, Location, SourceTable};
use crate::summarizer::HeadlineSummarizer;
use dialoguer::console::Term;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Select};
use std::error::Error;
use tracing::{error, info, instrument};

pub const TITLE: &str = "Local News Summarizer";
pub const SUBTITLE: &str = "Get tailored local news based on your location and genre!";
pub const CAPTION: &str = "Powered by reqwest, scraper, and an OpenAI-compatible model.";

/// The question asked after headlines are shown.
pub const SUMMARIZE_QUESTION: &str = "Summarize these headlines?";
/// The question asked at the end of every round.
pub const AGAIN_QUESTION: &str = "Fetch more news?";

/// Source of user choices and sink for rendered text.
///
/// `Ok(None)` from [`select`](Prompter::select) or
/// [`confirm`](Prompter::confirm) means the user backed out (Esc, `q`, or end
/// of input); the form treats it as "stop".
pub trait Prompter {
    /// Ask the user to pick one of `items`.
    ///
    /// # Returns
    ///
    /// The index of the picked item, or `None` if the user backed out.
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>, Box<dyn Error>>;

    /// Ask a yes/no question. Defaults to no.
    fn confirm(&mut self, question: &str) -> Result<Option<bool>, Box<dyn Error>>;

    /// Display a block of text.
    fn show(&mut self, text: &str) -> Result<(), Box<dyn Error>>;
}

/// [`Prompter`] backed by `dialoguer`, drawing on stdout.
pub struct TerminalPrompter {
    term: Term,
    theme: ColorfulTheme,
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalPrompter {
    /// Prompts and output both go to stdout with the colorful theme.
    pub fn new() -> Self {
        Self {
            term: Term::stdout(),
            theme: ColorfulTheme::default(),
        }
    }
}

impl Prompter for TerminalPrompter {
    fn select(&mut self, prompt: &str, items: &[&str]) -> Result<Option<usize>, Box<dyn Error>> {
        let choice = Select::with_theme(&self.theme)
            .with_prompt(prompt)
            .items(items)
            .default(0)
            .interact_on_opt(&self.term)?;
        Ok(choice)
    }

    fn confirm(&mut self, question: &str) -> Result<Option<bool>, Box<dyn Error>> {
        let answer = Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(false)
            .interact_on_opt(&self.term)?;
        Ok(answer)
    }

    fn show(&mut self, text: &str) -> Result<(), Box<dyn Error>> {
        self.term.write_line(text.trim_end_matches('\n'))?;
        Ok(())
    }
}

/// One run of the news form.
///
/// Borrows everything it needs; the same session serves the interactive loop
/// and one-shot command-line runs.
pub struct Session<'a, T> {
    /// Where (location, genre) pairs are looked up.
    sources: &'a SourceTable,
    /// Performs the "fetch" action.
    fetcher: &'a HeadlineFetcher,
    /// Performs the "summarize" action. `Err` carries the reason the backend
    /// could not be loaded.
    summarizer: Result<&'a HeadlineSummarizer<T>, String>,
    /// When set, every report is also written here as JSON.
    json_output_dir: Option<&'a str>,
}

impl<'a, T> Session<'a, T>
where
    T: SummarizeAsync,
{
    /// Bundle the handles built at startup.
    ///
    /// # Arguments
    ///
    /// * `sources` - The read-only source table
    /// * `fetcher` - Headline fetcher for the "fetch" action
    /// * `summarizer` - Loaded summarizer, or the reason it is unavailable
    /// * `json_output_dir` - Optional directory for JSON copies of each report
    pub fn new(
        sources: &'a SourceTable,
        fetcher: &'a HeadlineFetcher,
        summarizer: Result<&'a HeadlineSummarizer<T>, String>,
        json_output_dir: Option<&'a str>,
    ) -> Self {
        Self {
            sources,
            fetcher,
            summarizer,
            json_output_dir,
        }
    }

    /// The "fetch" action. `None` means no source is configured for the pair.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, location: Location, genre: Genre) -> Option<NewsReport> {
        let Some(url) = self.sources.lookup(location, genre) else {
            info!("No source configured");
            return None;
        };
        let headlines = self.fetcher.fetch(url).await;
        Some(NewsReport::new(location, genre, url, headlines))
    }

    /// The "summarize" action. Fills `report.summaries`; only fails when no
    /// backend is loaded.
    pub async fn summarize(&self, report: &mut NewsReport) -> Result<(), String> {
        let summarizer = self
            .summarizer
            .as_ref()
            .map_err(|reason| format!("Summarization unavailable: {reason}"))?;
        report.summaries = Some(summarizer.summarize_all(&report.headlines).await);
        Ok(())
    }

    /// Write the report to the JSON directory, if one is configured.
    /// A failed write is logged and otherwise ignored.
    pub async fn save(&self, report: &NewsReport) {
        if let Some(dir) = self.json_output_dir {
            if let Err(e) = write_report(report, dir).await {
                error!(error = %e, "Failed to write JSON report");
            }
        }
    }

    /// Run the form until the user declines to fetch more or backs out.
    pub async fn run_interactive<P: Prompter>(
        &self,
        prompter: &mut P,
    ) -> Result<(), Box<dyn Error>> {
        let locations = Location::ALL.map(|location| location.name());
        let genres = Genre::ALL.map(|genre| genre.name());

        prompter.show(&format!("{TITLE}\n{SUBTITLE}\n"))?;

        loop {
            let Some(location) = prompter.select("Select your location", &locations)? else {
                break;
            };
            let Some(genre) = prompter.select("Select the news genre", &genres)? else {
                break;
            };
            let (location, genre) = (Location::ALL[location], Genre::ALL[genre]);

            prompter.show("Fetching news articles...")?;
            match self.fetch(location, genre).await {
                None => prompter.show(NO_SOURCES)?,
                Some(mut report) => {
                    prompter.show(&render_headlines(&report))?;
                    if prompter.confirm(SUMMARIZE_QUESTION)? == Some(true) {
                        prompter.show("Summarizing articles...")?;
                        match self.summarize(&mut report).await {
                            Ok(()) => {
                                let summaries = report.summaries.as_deref().unwrap_or_default();
                                prompter.show(&render_summaries(summaries))?;
                            }
                            Err(message) => prompter.show(&message)?,
                        }
                    }
                    self.save(&report).await;
                }
            }

            if prompter.confirm(AGAIN_QUESTION)? != Some(true) {
                break;
            }
        }

        prompter.show(&format!("\n{CAPTION}"))
    }
}
