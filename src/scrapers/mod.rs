//! Scrapers for news section pages.
//!
//! | Scraper | Module | Method | Notes |
//! |---------|--------|--------|-------|
//! | Section headlines | [`headlines`] | HTML scraping | First N matches of a heading selector |
//!
//! Scrapers never fail outward: transport errors, bad statuses and empty pages
//! are turned into a single displayable placeholder line so the calling form
//! can always render something.

pub mod headlines;
