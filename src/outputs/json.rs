//! JSON output for news reports.
//!
//! # Output Structure
//!
//! Files are grouped by the date of the fetch:
//! ```text
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── new-york_politics.json
//!     └── los-angeles_sports.json
//! ```
//!
//! Fetching the same pair twice on one day overwrites the earlier file.

use crate::models::NewsReport;
use crate::outputs::text::NO_SOURCES;
use crate::sources::{Genre, Location};
use crate::utils::slugify_title;
use std::error::Error;
use std::path::PathBuf;
use tokio::fs;
use tracing::{error, info, instrument};

/// Pretty-printed JSON for a report.
pub fn report_to_json(report: &NewsReport) -> Result<String, Box<dyn Error>> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Pretty-printed JSON error object for a pair with no configured source.
///
/// Keeps `--format json` output machine-readable when there is no report:
///
/// ```text
/// {
///   "location": "Chicago",
///   "genre": "Politics",
///   "error": "No news sources available for the selected location and genre."
/// }
/// ```
pub fn unavailable_to_json(location: Location, genre: Genre) -> Result<String, Box<dyn Error>> {
    let value = serde_json::json!({
        "location": location,
        "genre": genre,
        "error": NO_SOURCES,
    });
    Ok(serde_json::to_string_pretty(&value)?)
}

/// Path a report is written to under `json_output_dir`.
pub fn report_path(report: &NewsReport, json_output_dir: &str) -> PathBuf {
    PathBuf::from(json_output_dir)
        .join(&report.local_date)
        .join(format!(
            "{}_{}.json",
            slugify_title(report.location.name()),
            slugify_title(report.genre.name())
        ))
}

/// Write a [`NewsReport`] to `{json_output_dir}/{date}/{location}_{genre}.json`.
#[instrument(level = "info", skip_all, fields(json_output_dir = %json_output_dir))]
pub async fn write_report(
    report: &NewsReport,
    json_output_dir: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = report_to_json(report)?;
    let path = report_path(report, json_output_dir);

    if let Some(dir) = path.parent() {
        if let Err(e) = fs::create_dir_all(dir).await {
            error!(dir = %dir.display(), error = %e, "Failed to create JSON dir");
            return Err(e.into());
        }
    }

    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> NewsReport {
        let mut report = NewsReport::new(
            Location::NewYork,
            Genre::Health,
            "https://www.nytimes.com/section/health",
            vec!["Flu season starts early".to_string()],
        );
        report.local_date = "2025-05-06".to_string();
        report
    }

    #[test]
    fn test_report_path() {
        let path = report_path(&report(), "/srv/json");
        assert_eq!(path, PathBuf::from("/srv/json/2025-05-06/new-york_health.json"));
    }

    #[test]
    fn test_unavailable_is_valid_json() {
        let text = unavailable_to_json(Location::Chicago, Genre::Politics).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["location"], "Chicago");
        assert_eq!(value["genre"], "Politics");
        assert_eq!(value["error"], NO_SOURCES);
    }

    #[tokio::test]
    async fn test_write_report_round_trips() {
        let dir = std::env::temp_dir().join(format!("local_news_json_{}", std::process::id()));
        let dir_str = dir.to_str().unwrap().to_string();

        let path = write_report(&report(), &dir_str).await.unwrap();
        let written = std::fs::read_to_string(&path).unwrap();
        let back: NewsReport = serde_json::from_str(&written).unwrap();
        assert_eq!(back, report());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
