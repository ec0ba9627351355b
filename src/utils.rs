//! Utility functions for text cleanup, logging and file system checks.
//!
//! - Whitespace normalization for scraped headline text
//! - Word clamping for model output
//! - String truncation and slugification for logging and file names
//! - File system validation for output directories

use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// Collapse every whitespace run to a single space and trim both ends.
///
/// Headline markup often nests spans and line breaks inside the heading tag,
/// which would otherwise leak into the extracted text.
pub fn normalize_whitespace(s: &str) -> String {
    WHITESPACE_RUN.replace_all(s.trim(), " ").into_owned()
}

/// Keep at most `max_words` whitespace-separated words of `s`.
pub fn clamp_words(s: &str, max_words: usize) -> String {
    s.split_whitespace()
        .take(max_words)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Truncate a string for logging purposes.
///
/// Long strings are cut at the nearest char boundary at or below `max`
/// bytes, with an ellipsis and the number of dropped bytes appended.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Convert a display name to a file-name friendly slug.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("New York"), "new-york");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then creates and removes a scratch file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    let scratch_path = format!("{}/..__write_check__", path.trim_end_matches('/'));
    match stdfs::File::create(&scratch_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&scratch_path);
            info!("Output directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  Budget talks stall \n"), "Budget talks stall");
        assert_eq!(
            normalize_whitespace("Mayor\n      <wins>\t runoff"),
            "Mayor <wins> runoff"
        );
        assert_eq!(normalize_whitespace(" \n\t "), "");
    }

    #[test]
    fn test_clamp_words() {
        assert_eq!(clamp_words("one two three", 2), "one two");
        assert_eq!(clamp_words("  one   two ", 5), "one two");
        assert_eq!(clamp_words("one", 0), "");
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_char_boundary() {
        let result = truncate_for_log("héllo", 2);
        assert_eq!(result, "h…(+5 bytes)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("New York"), "new-york");
        assert_eq!(slugify_title("Los Angeles"), "los-angeles");
        assert_eq!(slugify_title("Politics"), "politics");
        assert_eq!(slugify_title("Arts & Culture!"), "arts--culture");
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("local_news_writable_{}", std::process::id()));
        let path = dir.to_str().unwrap().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
