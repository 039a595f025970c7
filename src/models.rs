//! Data models for the catalog dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing catalog rows, rankings and the
//! assembled dashboard.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder written into categorical columns that were left empty.
pub const UNKNOWN: &str = "Unknown";

/// A catalog row exactly as it appears in the CSV file.
///
/// Every column is optional; empty cells deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RawRecord {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub title: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "empty_as_none")]
    pub kind: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub director: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub date_added: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub listed_in: Option<String>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContentType {
    Movie,
    TvShow,
    Other,
}

impl ContentType {
    /// Classify the raw `type` column value.
    pub fn from_kind(kind: &str) -> Self {
        match kind {
            "Movie" => ContentType::Movie,
            "TV Show" => ContentType::TvShow,
            _ => ContentType::Other,
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentType::Movie => write!(f, "Movie"),
            ContentType::TvShow => write!(f, "TV Show"),
            ContentType::Other => write!(f, "Other"),
        }
    }
}

/// A cleaned catalog row.
///
/// `kind`, `country` and `listed_in` are never empty after cleaning;
/// `title` and `director` stay optional and are only filtered when ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub title: Option<String>,
    pub kind: String,
    pub director: Option<String>,
    pub country: String,
    pub date_added: Option<NaiveDate>,
    pub year_added: Option<i32>,
    pub month_added: Option<String>,
    pub listed_in: String,
}

impl CatalogEntry {
    pub fn content_type(&self) -> ContentType {
        ContentType::from_kind(&self.kind)
    }
}

/// Colour scheme of the rendered page.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// Returns the CSS class applied to `<body>`.
    pub fn css_class(&self) -> &'static str {
        match self {
            Theme::Dark => "theme-dark",
            Theme::Light => "theme-light",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Dark => write!(f, "dark"),
            Theme::Light => write!(f, "light"),
        }
    }
}

/// One line of a value-count table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranked {
    pub label: String,
    pub count: usize,
}

impl Ranked {
    pub fn new(label: impl Into<String>, count: usize) -> Self {
        Self {
            label: label.into(),
            count,
        }
    }
}

/// Headline numbers shown in the metric cards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    /// Number of rows in the catalog.
    pub total_titles: usize,
    /// Rows whose type is exactly "Movie".
    pub total_movies: usize,
    /// Rows whose type is exactly "TV Show".
    pub total_tv_shows: usize,
    /// Distinct values of the (unsplit) country column.
    pub countries: usize,
}

/// Metadata about a dashboard build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardMetadata {
    /// Page heading.
    pub title: String,
    /// Path of the CSV the dashboard was built from.
    pub source: String,
    /// When the dashboard was generated.
    pub generated_at: DateTime<Utc>,
    /// Rows loaded successfully.
    pub rows_loaded: usize,
    /// Rows skipped because they could not be parsed.
    pub rows_skipped: usize,
    /// Rows whose `date_added` could not be parsed.
    pub undated_rows: usize,
    /// Size of the top-N rankings.
    pub top_n: usize,
}

/// Everything needed to render the dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dashboard {
    pub metadata: DashboardMetadata,
    pub metrics: Metrics,
    /// Counts per content type ("Content by Type").
    pub by_type: Vec<Ranked>,
    /// Titles added per year, ascending by year.
    pub by_year: Vec<(i32, usize)>,
    pub top_genres: Vec<Ranked>,
    pub top_countries: Vec<Ranked>,
    pub top_directors: Vec<Ranked>,
    pub top_titles: Vec<Ranked>,
}
