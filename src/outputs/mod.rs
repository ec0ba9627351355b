//! Output generation for fetched reports.
//!
//! # Submodules
//!
//! - [`text`]: numbered plain-text lists for the terminal form
//! - [`json`]: JSON serialization, to stdout or to dated files
//!
//! # Output Structure
//!
//! ```text
//! Top Politics News in New York
//! 1. ...
//! 2. ...
//!
//! Summarized News
//! 1. ...
//! ```

pub mod json;
pub mod text;
