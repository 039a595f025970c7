//! Catalog aggregation and statistics.
//!
//! This module provides the group-by-count primitives behind every
//! dashboard panel: exploding multi-value columns, value counts,
//! top-N rankings and the headline metrics.

use crate::loader::LoadedCatalog;
use crate::models::{CatalogEntry, ContentType, Dashboard, DashboardMetadata, Metrics, Ranked};
use chrono::Utc;
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

/// Delimiter used by the multi-value `country` and `listed_in` columns.
pub const LIST_DELIMITER: char = ',';

/// Options controlling a dashboard build.
#[derive(Debug, Clone)]
pub struct DashboardOptions {
    /// Page heading.
    pub title: String,
    /// Label for the data source, usually the CSV path.
    pub source: String,
    /// Size of the top-N rankings.
    pub top_n: usize,
}

/// Split delimited values into one trimmed item per piece.
///
/// Empty pieces (e.g. from a trailing delimiter) are dropped.
pub fn explode<'a, I>(values: I, delimiter: char) -> impl Iterator<Item = &'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .flat_map(move |value| value.split(delimiter))
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
}

/// Count occurrences, most frequent first.
///
/// Ties keep the order in which the values were first seen.
pub fn value_counts<I, S>(values: I) -> Vec<Ranked>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut counts: Vec<Ranked> = Vec::new();

    for value in values {
        let value = value.as_ref();
        match positions.get(value) {
            Some(&idx) => counts[idx].count += 1,
            None => {
                positions.insert(value.to_string(), counts.len());
                counts.push(Ranked::new(value, 1));
            }
        }
    }

    // Stable sort keeps first-encounter order among equal counts
    counts.sort_by_key(|r| std::cmp::Reverse(r.count));
    counts
}

/// The `n` most frequent values.
pub fn top_n<I, S>(values: I, n: usize) -> Vec<Ranked>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut counts = value_counts(values);
    counts.truncate(n);
    counts
}

/// Counts per content type.
pub fn counts_by_type(entries: &[CatalogEntry]) -> Vec<Ranked> {
    value_counts(entries.iter().map(|e| e.kind.as_str()))
}

/// Titles added per year, ascending by year. Undated rows are left out.
pub fn titles_by_year(entries: &[CatalogEntry]) -> Vec<(i32, usize)> {
    let mut years: BTreeMap<i32, usize> = BTreeMap::new();

    for year in entries.iter().filter_map(|e| e.year_added) {
        *years.entry(year).or_default() += 1;
    }

    years.into_iter().collect()
}

/// Most common genres after splitting `listed_in`.
pub fn top_genres(entries: &[CatalogEntry], n: usize) -> Vec<Ranked> {
    top_n(
        explode(entries.iter().map(|e| e.listed_in.as_str()), LIST_DELIMITER),
        n,
    )
}

/// Most common countries after splitting `country`.
pub fn top_countries(entries: &[CatalogEntry], n: usize) -> Vec<Ranked> {
    top_n(
        explode(entries.iter().map(|e| e.country.as_str()), LIST_DELIMITER),
        n,
    )
}

/// Most prolific directors. Rows without a director are ignored.
pub fn top_directors(entries: &[CatalogEntry], n: usize) -> Vec<Ranked> {
    top_n(entries.iter().filter_map(|e| e.director.as_deref()), n)
}

/// Most frequently repeated titles. Rows without a title are ignored.
pub fn top_titles(entries: &[CatalogEntry], n: usize) -> Vec<Ranked> {
    top_n(entries.iter().filter_map(|e| e.title.as_deref()), n)
}

/// Compute the headline metrics.
pub fn compute_metrics(entries: &[CatalogEntry]) -> Metrics {
    let mut metrics = Metrics {
        total_titles: entries.len(),
        ..Metrics::default()
    };

    for entry in entries {
        match entry.content_type() {
            ContentType::Movie => metrics.total_movies += 1,
            ContentType::TvShow => metrics.total_tv_shows += 1,
            ContentType::Other => {}
        }
    }

    metrics.countries = entries
        .iter()
        .map(|e| e.country.as_str())
        .collect::<HashSet<_>>()
        .len();

    metrics
}

/// Assemble every panel of the dashboard.
pub fn build_dashboard(catalog: &LoadedCatalog, options: &DashboardOptions) -> Dashboard {
    let entries = &catalog.entries;
    let n = options.top_n;

    let dashboard = Dashboard {
        metadata: DashboardMetadata {
            title: options.title.clone(),
            source: options.source.clone(),
            generated_at: Utc::now(),
            rows_loaded: entries.len(),
            rows_skipped: catalog.rows_skipped,
            undated_rows: catalog.undated_rows(),
            top_n: n,
        },
        metrics: compute_metrics(entries),
        by_type: counts_by_type(entries),
        by_year: titles_by_year(entries),
        top_genres: top_genres(entries, n),
        top_countries: top_countries(entries, n),
        top_directors: top_directors(entries, n),
        top_titles: top_titles(entries, n),
    };

    debug!(
        "Built dashboard: {} titles, {} years, {} genres",
        dashboard.metrics.total_titles,
        dashboard.by_year.len(),
        dashboard.top_genres.len()
    );

    dashboard
}

/// Generate a plain-text summary of the metrics.
pub fn generate_summary_text(metrics: &Metrics) -> String {
    [
        format!("Total Titles: {}", metrics.total_titles),
        format!("- Movies: {}", metrics.total_movies),
        format!("- TV Shows: {}", metrics.total_tv_shows),
        format!("Countries: {}", metrics.countries),
    ]
    .join("\n")
}
