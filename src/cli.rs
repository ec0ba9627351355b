//! Command-line interface definitions for Local News.
//!
//! Without `--location` and `--genre` the program runs the interactive form.
//! With both it performs a single fetch (and summary, with `--summarize`) and
//! exits.

use crate::sources::{Genre, Location};
use clap::{Parser, ValueEnum};

/// How a non-interactive run prints its report.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Command-line arguments for the Local News application.
///
/// # Examples
///
/// ```sh
/// # Interactive form
/// local_news
///
/// # One-shot fetch and summary
/// local_news -l new-york -g politics --summarize
///
/// # Custom source table, JSON to stdout
/// local_news --sources ./sources.yaml -l chicago -g sports --format json
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Location to fetch headlines for (skips the form together with --genre)
    #[arg(short, long, value_enum, requires = "genre")]
    pub location: Option<Location>,

    /// News genre to fetch (skips the form together with --location)
    #[arg(short, long, value_enum, requires = "location")]
    pub genre: Option<Genre>,

    /// Also summarize the fetched headlines (non-interactive mode)
    #[arg(short, long)]
    pub summarize: bool,

    /// Print the configured sources and exit
    #[arg(long)]
    pub list_sources: bool,

    /// YAML file replacing the built-in source table
    #[arg(long, env = "LOCAL_NEWS_SOURCES")]
    pub sources: Option<String>,

    /// Optional path to the LLM config.yaml file
    #[arg(short, long, env = "LOCAL_NEWS_CONFIG")]
    pub config: Option<String>,

    /// Chat template used for summaries
    #[arg(short, long, default_value = "headline_summarizer")]
    pub template: String,

    /// HTTP timeout for fetching a section page, in seconds
    #[arg(long, default_value_t = 10)]
    pub timeout_secs: u64,

    /// Maximum number of headlines read from a section page
    #[arg(long, default_value_t = 5)]
    pub max_headlines: usize,

    /// CSS selector matching headline elements
    #[arg(long, default_value = "h2")]
    pub selector: String,

    /// Maximum summary length, in words
    #[arg(long, default_value_t = 50)]
    pub max_length: usize,

    /// Minimum summary length, in words
    #[arg(long, default_value_t = 10)]
    pub min_length: usize,

    /// Retries per headline when the model call fails (0 disables retrying)
    #[arg(long, default_value_t = 0)]
    pub max_retries: usize,

    /// Output format for non-interactive runs
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Also write each report as JSON under this directory
    #[arg(short, long)]
    pub json_output_dir: Option<String>,
}

impl Cli {
    /// Both selections given on the command line.
    pub fn selection(&self) -> Option<(Location, Genre)> {
        self.location.zip(self.genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["local_news"]);

        assert_eq!(cli.selection(), None);
        assert!(!cli.summarize);
        assert_eq!(cli.timeout_secs, 10);
        assert_eq!(cli.max_headlines, 5);
        assert_eq!(cli.selector, "h2");
        assert_eq!(cli.max_length, 50);
        assert_eq!(cli.min_length, 10);
        assert_eq!(cli.max_retries, 0);
        assert_eq!(cli.template, "headline_summarizer");
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_cli_short_flags() {
        let cli = Cli::parse_from([
            "local_news",
            "-l",
            "los-angeles",
            "-g",
            "health",
            "-s",
            "-j",
            "/tmp/json",
        ]);

        assert_eq!(cli.selection(), Some((Location::LosAngeles, Genre::Health)));
        assert!(cli.summarize);
        assert_eq!(cli.json_output_dir.as_deref(), Some("/tmp/json"));
    }

    #[test]
    fn test_cli_location_requires_genre() {
        assert!(Cli::try_parse_from(["local_news", "--location", "miami"]).is_err());
        assert!(Cli::try_parse_from(["local_news", "--genre", "sports"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_location() {
        assert!(Cli::try_parse_from(["local_news", "-l", "boston", "-g", "sports"]).is_err());
    }
}
