//! # Local News
//!
//! Fetches the top headlines of a city's news section page for a chosen genre
//! and, on request, summarizes each headline through an LLM.
//!
//! ## Usage
//!
//! ```sh
//! local_news                                  # interactive form
//! local_news -l new-york -g politics -s       # one-shot fetch + summary
//! local_news --list-sources
//! ```
//!
//! ## Architecture
//!
//! 1. **Lookup**: (location, genre) → section URL from the [`sources::SourceTable`]
//! 2. **Fetching**: one GET, first few `h2` headings, failures become placeholder lines
//! 3. **Summarizing**: one model call per headline, sequential, failures isolated per item
//! 4. **Output**: numbered text lists or JSON, optionally written to dated files

use awful_aj::{config, config_dir, template};
use clap::Parser;
use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod api;
mod cli;
mod form;
mod models;
mod outputs;
mod scrapers;
mod sources;
mod summarizer;
mod utils;

use api::{AwfulSummarizer, RetrySummarize, SummaryBounds, sampling_warning};
use cli::{Cli, OutputFormat};
use form::{Session, TerminalPrompter};
use outputs::{json, text};
use scrapers::headlines::{FetchSettings, HeadlineFetcher};
use sources::SourceTable;
use summarizer::HeadlineSummarizer;
use utils::ensure_writable_dir;

type Backend = RetrySummarize<AwfulSummarizer>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tfmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("local_news starting up");

    let args = Cli::parse();
    debug!(?args, "Parsed CLI arguments");

    // ---- Read-only configuration, built once ----
    let sources = match &args.sources {
        Some(path) => SourceTable::load(path).await?,
        None => SourceTable::default(),
    };
    info!(count = sources.len(), "Source table ready");

    if args.list_sources {
        print!("{}", text::render_sources(&sources));
        return Ok(());
    }

    let bounds = SummaryBounds::new(args.min_length, args.max_length)?;
    let fetcher = HeadlineFetcher::new(&FetchSettings {
        timeout: Duration::from_secs(args.timeout_secs),
        selector: args.selector.clone(),
        limit: args.max_headlines,
    })?;

    if let Some(dir) = &args.json_output_dir {
        if let Err(e) = ensure_writable_dir(dir).await {
            error!(
                path = %dir,
                error = %e,
                "JSON output directory is not writable (fix perms or choose a different path)"
            );
            return Err(e);
        }
    }

    // ---- Summarization backend ----
    let selection = args.selection();
    let needs_backend = selection.is_none() || args.summarize;
    let summarizer = if needs_backend {
        match load_summarizer(&args, bounds).await {
            Ok(summarizer) => Ok(summarizer),
            Err(e) if selection.is_some() => {
                error!(error = %e, "Failed to load summarization backend");
                return Err(e);
            }
            Err(e) => {
                warn!(error = %e, "Summarization backend unavailable; continuing without it");
                Err(e.to_string())
            }
        }
    } else {
        Err("not requested".to_string())
    };

    let session = Session::new(
        &sources,
        &fetcher,
        summarizer.as_ref().map_err(String::clone),
        args.json_output_dir.as_deref(),
    );

    match selection {
        None => {
            let mut prompter = TerminalPrompter::new();
            session.run_interactive(&mut prompter).await?;
        }
        Some((location, genre)) => {
            let Some(mut report) = session.fetch(location, genre).await else {
                match args.format {
                    OutputFormat::Text => println!("{}", text::NO_SOURCES),
                    OutputFormat::Json => {
                        println!("{}", json::unavailable_to_json(location, genre)?)
                    }
                }
                return Ok(());
            };
            if args.summarize {
                session.summarize(&mut report).await?;
            }
            session.save(&report).await;

            match args.format {
                OutputFormat::Text => print!("{}", text::render_report(&report)),
                OutputFormat::Json => println!("{}", json::report_to_json(&report)?),
            }
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}

/// Load the LLM configuration and chat template and wrap them in the
/// summarizer.
#[instrument(level = "info", skip_all, fields(template = %args.template))]
async fn load_summarizer(
    args: &Cli,
    bounds: SummaryBounds,
) -> Result<HeadlineSummarizer<Backend>, Box<dyn Error>> {
    let conf_file = match &args.config {
        Some(path) => PathBuf::from(path),
        None => config_dir()?.join("config.yaml"),
    };
    let config_path = conf_file
        .to_str()
        .ok_or_else(|| format!("not a valid config filename: {}", conf_file.display()))?;
    let config = config::load_config(config_path)?;
    info!(config_path, "Loaded configuration");

    match fs::read_to_string(config_path).await {
        Ok(raw) => {
            if let Some(reason) = sampling_warning(&raw) {
                warn!(
                    config_path,
                    %reason,
                    "Summaries may not be deterministic; set `temperature: 0`"
                );
            }
        }
        Err(e) => warn!(config_path, error = %e, "Could not re-read config for sampling check"),
    }

    let template = template::load_template(&args.template).await?;
    info!(template = %args.template, "Loaded template");

    let backend = RetrySummarize::new(
        AwfulSummarizer::new(config, template),
        args.max_retries,
        Duration::from_secs(1),
    );
    Ok(HeadlineSummarizer::new(backend, bounds))
}
