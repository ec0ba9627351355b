//! Data models for fetched headlines and their summaries.
//!
//! A [`NewsReport`] is created per fetch action and discarded after it has
//! been rendered (and optionally written to JSON). Nothing carries over
//! between actions.

use crate::sources::{Genre, Location};
use chrono::Local;
use serde::{Deserialize, Serialize};

/// The result of one fetch action, with summaries once requested.
///
/// `summaries`, when present, is positionally paired with `headlines`:
/// `summaries[i]` summarizes `headlines[i]`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct NewsReport {
    pub location: Location,
    pub genre: Genre,
    /// The section page the headlines were scraped from.
    pub source_url: String,
    /// Local date of the fetch in `YYYY-MM-DD` format.
    pub local_date: String,
    /// Local time of the fetch in `HH:MM:SS` format.
    pub local_time: String,
    pub headlines: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summaries: Option<Vec<String>>,
}

impl NewsReport {
    /// Stamp a freshly fetched set of headlines with the current local time.
    pub fn new(location: Location, genre: Genre, source_url: &str, headlines: Vec<String>) -> Self {
        let now = Local::now();
        Self {
            location,
            genre,
            source_url: source_url.to_string(),
            local_date: now.date_naive().to_string(),
            local_time: now.time().format("%H:%M:%S").to_string(),
            headlines,
            summaries: None,
        }
    }
}
