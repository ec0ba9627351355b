//! Locations, genres and the table of news section pages they map to.
//!
//! The [`SourceTable`] is built once at startup, either from the built-in
//! defaults or from a YAML file, and is read-only afterwards. Not every
//! location carries every genre; a missing pair is reported to the user as
//! "no sources available" rather than treated as an error.
//!
//! # YAML Format
//!
//! Keys are the display names of [`Location`] and [`Genre`]:
//!
//! ```yaml
//! New York:
//!   Politics: https://www.nytimes.com/section/politics
//! Chicago:
//!   Sports: https://www.chicagotribune.com/sports/
//! ```

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt;
use tokio::fs;
use tracing::{debug, info, instrument};
use url::Url;

/// A city the user can pick headlines for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Location {
    #[serde(rename = "New York")]
    NewYork,
    #[serde(rename = "Los Angeles")]
    LosAngeles,
    Chicago,
    Houston,
    Miami,
}

impl Location {
    /// Every location, in menu order.
    pub const ALL: [Location; 5] = [
        Location::NewYork,
        Location::LosAngeles,
        Location::Chicago,
        Location::Houston,
        Location::Miami,
    ];

    /// Display name, also used as the YAML key.
    pub fn name(&self) -> &'static str {
        match self {
            Location::NewYork => "New York",
            Location::LosAngeles => "Los Angeles",
            Location::Chicago => "Chicago",
            Location::Houston => "Houston",
            Location::Miami => "Miami",
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A news category.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ValueEnum,
)]
pub enum Genre {
    Politics,
    Sports,
    Technology,
    Entertainment,
    Health,
}

impl Genre {
    /// Every genre, in menu order.
    pub const ALL: [Genre; 5] = [
        Genre::Politics,
        Genre::Sports,
        Genre::Technology,
        Genre::Entertainment,
        Genre::Health,
    ];

    /// Display name, also used as the YAML key.
    pub fn name(&self) -> &'static str {
        match self {
            Genre::Politics => "Politics",
            Genre::Sports => "Sports",
            Genre::Technology => "Technology",
            Genre::Entertainment => "Entertainment",
            Genre::Health => "Health",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Read-only mapping from (location, genre) to a section page URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SourceTable {
    /// Location → genre → section page URL. Missing entries are valid.
    sources: BTreeMap<Location, BTreeMap<Genre, String>>,
}

impl Default for SourceTable {
    /// The built-in table: New York and Los Angeles sections only.
    fn default() -> Self {
        let new_york = [
            (Genre::Politics, "https://www.nytimes.com/section/politics"),
            (Genre::Sports, "https://www.nytimes.com/section/sports"),
            (Genre::Technology, "https://www.nytimes.com/section/technology"),
            (Genre::Entertainment, "https://www.nytimes.com/section/arts"),
            (Genre::Health, "https://www.nytimes.com/section/health"),
        ];
        let los_angeles = [
            (Genre::Politics, "https://www.latimes.com/politics"),
            (Genre::Sports, "https://www.latimes.com/sports"),
            (Genre::Technology, "https://www.latimes.com/business/technology"),
            (Genre::Entertainment, "https://www.latimes.com/entertainment-arts"),
            (Genre::Health, "https://www.latimes.com/science"),
        ];

        let mut table = SourceTable::empty();
        for (genre, url) in new_york {
            table.insert(Location::NewYork, genre, url);
        }
        for (genre, url) in los_angeles {
            table.insert(Location::LosAngeles, genre, url);
        }
        table
    }
}

impl SourceTable {
    /// A table with no sources at all.
    pub fn empty() -> Self {
        Self {
            sources: BTreeMap::new(),
        }
    }

    /// Add or replace the URL for a pair. Used while building a table.
    pub fn insert(&mut self, location: Location, genre: Genre, url: impl Into<String>) {
        self.sources
            .entry(location)
            .or_default()
            .insert(genre, url.into());
    }

    /// Look up the section page for a pair, if one is configured.
    pub fn lookup(&self, location: Location, genre: Genre) -> Option<&str> {
        self.sources
            .get(&location)
            .and_then(|genres| genres.get(&genre))
            .map(String::as_str)
    }

    /// All configured pairs in location then genre order.
    pub fn entries(&self) -> impl Iterator<Item = (Location, Genre, &str)> {
        self.sources.iter().flat_map(|(location, genres)| {
            genres
                .iter()
                .map(move |(genre, url)| (*location, *genre, url.as_str()))
        })
    }

    /// Number of configured (location, genre) pairs.
    pub fn len(&self) -> usize {
        self.sources.values().map(BTreeMap::len).sum()
    }

    /// `true` when no pair has a source.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse and validate a table from YAML text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed YAML, keys outside the fixed location
    /// and genre sets, or URLs rejected by [`SourceTable::validate`].
    pub fn from_yaml_str(yaml: &str) -> Result<Self, Box<dyn Error>> {
        let table: SourceTable = serde_yaml::from_str(yaml)?;
        table.validate()?;
        Ok(table)
    }

    /// Load a table from a YAML file on disk.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the YAML file
    ///
    /// # Returns
    ///
    /// The validated table, or an error if the file cannot be read or parsed.
    #[instrument(level = "info", skip_all, fields(path = %path))]
    pub async fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let yaml = fs::read_to_string(path).await?;
        let table = Self::from_yaml_str(&yaml)?;
        info!(count = table.len(), "Loaded source table");
        Ok(table)
    }

    /// Every URL must be absolute http(s).
    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        for (location, genre, raw) in self.entries() {
            let url = Url::parse(raw)
                .map_err(|e| format!("invalid URL for {location}/{genre} ({raw:?}): {e}"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(format!(
                    "URL for {location}/{genre} must be http or https, got {:?}",
                    url.scheme()
                )
                .into());
            }
            debug!(%location, %genre, %url, "Validated source");
        }
        Ok(())
    }
}
