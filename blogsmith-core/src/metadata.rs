//! Pulls feed metadata out of a post's markdown.
//!
//! Posts follow a fixed layout:
//!
//! ```text
//! # Title                                   <- TITLE_LINE
//!
//! <span class="date">2020-01-01</span>
//!
//! First paragraph, used as the summary.     <- DESCRIPTION_LINE
//! ```
//!
//! The date marker may appear anywhere in the document.

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;

/// Line holding the `# ` heading.
pub const TITLE_LINE: usize = 0;
/// Line taken verbatim as the feed description.
pub const DESCRIPTION_LINE: usize = 4;

pub const HEADING_MARKER: &str = "# ";
pub const SORT_KEY_FORMAT: &str = "%Y-%m-%d";
pub const DISPLAY_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

static DATE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<span class="date">(\d{4}-\d{2}-\d{2})</span>"#).expect("valid date regex")
});

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("first line must be a `# ` heading")]
    MissingTitle,
    #[error("document has no description line (expected line {})", DESCRIPTION_LINE + 1)]
    MissingDescription,
    #[error("no <span class=\"date\">YYYY-MM-DD</span> marker found")]
    MissingDate,
    #[error("date marker holds an impossible date: {0}")]
    InvalidDate(String),
}

impl MetadataError {
    /// Whether the document layout itself is broken, as opposed to its date.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MissingTitle | Self::MissingDescription)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub title: String,
    /// ISO `YYYY-MM-DD`, fixed width so string order is date order
    pub sort_key: String,
    pub description: String,
}

/// Extract title, sort key and description from a post.
pub fn extract(text: &str) -> Result<Metadata, MetadataError> {
    let title = title(text)?;
    let sort_key = sort_key(text)?;
    let description = description_line(text)
        .ok_or(MetadataError::MissingDescription)?
        .to_string();

    Ok(Metadata {
        title,
        sort_key,
        description,
    })
}

pub fn title_line(text: &str) -> Option<&str> {
    text.lines().nth(TITLE_LINE)
}

pub fn description_line(text: &str) -> Option<&str> {
    text.lines().nth(DESCRIPTION_LINE)
}

/// The text after `# ` on the first line. Pages share this rule with the feed.
pub fn title(text: &str) -> Result<String, MetadataError> {
    title_line(text)
        .and_then(|line| line.strip_prefix(HEADING_MARKER))
        .filter(|title| !title.is_empty())
        .map(str::to_string)
        .ok_or(MetadataError::MissingTitle)
}

/// First date marker in the document, checked to be a real calendar date.
pub fn sort_key(text: &str) -> Result<String, MetadataError> {
    let iso = DATE_MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or(MetadataError::MissingDate)?;

    parse_sort_key(iso)?;
    Ok(iso.to_string())
}

/// Format an ISO date as `Wed, 01 Jan 2020 00:00:00`. Sources carry no time
/// of day so it is always midnight.
pub fn display_date(sort_key: &str) -> Result<String, MetadataError> {
    let date = parse_sort_key(sort_key)?;
    Ok(date
        .and_time(NaiveTime::MIN)
        .format(DISPLAY_DATE_FORMAT)
        .to_string())
}

fn parse_sort_key(iso: &str) -> Result<NaiveDate, MetadataError> {
    NaiveDate::parse_from_str(iso, SORT_KEY_FORMAT)
        .map_err(|_| MetadataError::InvalidDate(iso.to_string()))
}
