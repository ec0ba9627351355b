//! Plain-text rendering for the terminal form.

use crate::models::NewsReport;
use crate::sources::SourceTable;
use itertools::Itertools;

/// Shown when the selected location has no source for the selected genre.
pub const NO_SOURCES: &str = "No news sources available for the selected location and genre.";

/// Numbered list, one item per line, starting at 1.
pub fn numbered(items: &[String]) -> String {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| format!("{}. {}", idx + 1, item))
        .join("\n")
}

/// Heading plus numbered headlines for a fetched report.
pub fn render_headlines(report: &NewsReport) -> String {
    format!(
        "Top {} News in {}\n{}\n",
        report.genre,
        report.location,
        numbered(&report.headlines)
    )
}

/// Heading plus numbered summaries.
pub fn render_summaries(summaries: &[String]) -> String {
    format!("Summarized News\n{}\n", numbered(summaries))
}

/// The whole report: headlines, then summaries if present.
pub fn render_report(report: &NewsReport) -> String {
    match &report.summaries {
        Some(summaries) => format!(
            "{}\n{}",
            render_headlines(report),
            render_summaries(summaries)
        ),
        None => render_headlines(report),
    }
}

/// One `Location / Genre: url` line per configured source.
pub fn render_sources(table: &SourceTable) -> String {
    if table.is_empty() {
        return "No sources configured.\n".to_string();
    }
    let lines = table
        .entries()
        .map(|(location, genre, url)| format!("{location} / {genre}: {url}"))
        .join("\n");
    format!("{lines}\n")
}
