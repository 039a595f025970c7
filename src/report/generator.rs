//! Markdown and JSON dashboard generation.
//!
//! This module renders the dashboard as a Markdown document with one
//! table per panel, or as pretty-printed JSON.

use crate::analysis::generate_summary_text;
use crate::models::{Dashboard, DashboardMetadata, Metrics, Ranked};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(dashboard: &Dashboard) -> String {
    let mut output = String::new();

    output.push_str(&format!("# {}\n\n", dashboard.metadata.title));

    output.push_str(&generate_metadata_section(&dashboard.metadata));
    output.push_str(&generate_metrics_section(&dashboard.metrics));

    output.push_str(&generate_ranking_section(
        "Content by Type",
        "Type",
        "Count",
        &dashboard.by_type,
    ));
    output.push_str(&generate_years_section(&dashboard.by_year));

    let n = dashboard.metadata.top_n;
    output.push_str(&generate_ranking_section(
        &format!("Top {} Genres", n),
        "Genre",
        "Count",
        &dashboard.top_genres,
    ));
    output.push_str(&generate_ranking_section(
        &format!("Top {} Countries by Titles", n),
        "Country",
        "Count",
        &dashboard.top_countries,
    ));

    output.push_str("## Most Frequent Directors and Titles\n\n");
    output.push_str(&generate_ranking_table("Director", "Titles", &dashboard.top_directors));
    output.push_str(&generate_ranking_table("Title", "Frequency", &dashboard.top_titles));

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &DashboardMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** `{}`\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Loaded:** {}\n", metadata.rows_loaded));
    if metadata.rows_skipped > 0 {
        section.push_str(&format!("- **Rows Skipped:** {}\n", metadata.rows_skipped));
    }
    if metadata.undated_rows > 0 {
        section.push_str(&format!(
            "- **Rows Without Date Added:** {}\n",
            metadata.undated_rows
        ));
    }
    section.push('\n');

    section
}

/// Generate the headline metrics section.
fn generate_metrics_section(metrics: &Metrics) -> String {
    let mut section = String::new();

    section.push_str("## Summary\n\n");
    section.push_str("| Total Titles | Total Movies | Total TV Shows | Countries |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        metrics.total_titles, metrics.total_movies, metrics.total_tv_shows, metrics.countries
    ));

    section
}

fn generate_years_section(by_year: &[(i32, usize)]) -> String {
    let mut section = String::from("## Titles Added Over Years\n\n");

    if by_year.is_empty() {
        section.push_str("*No dated titles.*\n\n");
        return section;
    }

    section.push_str("| Year | Count |\n");
    section.push_str("|:---|:---:|\n");
    for (year, count) in by_year {
        section.push_str(&format!("| {} | {} |\n", year, count));
    }
    section.push('\n');

    section
}

fn generate_ranking_section(title: &str, label: &str, value: &str, rows: &[Ranked]) -> String {
    let mut section = format!("## {}\n\n", title);
    section.push_str(&generate_ranking_table(label, value, rows));
    section
}

/// Generate a two-column ranking table.
fn generate_ranking_table(label: &str, value: &str, rows: &[Ranked]) -> String {
    if rows.is_empty() {
        return format!("*No {} data.*\n\n", label.to_lowercase());
    }

    let mut table = String::new();
    table.push_str(&format!("| {} | {} |\n", label, value));
    table.push_str("|:---|:---:|\n");

    for row in rows {
        // Pipes would break the table layout
        table.push_str(&format!("| {} | {} |\n", row.label.replace('|', "\\|"), row.count));
    }
    table.push('\n');

    table
}

/// Generate the report footer.
fn generate_footer() -> String {
    "---\n\n*Generated by catalogdash*\n".to_string()
}

/// Generate a JSON report.
pub fn generate_json_report(dashboard: &Dashboard) -> Result<String> {
    serde_json::to_string_pretty(dashboard).map_err(Into::into)
}

/// Generate the short console summary printed after a build.
pub fn generate_console_summary(dashboard: &Dashboard) -> String {
    generate_summary_text(&dashboard.metrics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::fixtures::create_test_dashboard;

    #[test]
    fn test_generate_markdown_report() {
        let dashboard = create_test_dashboard();
        let markdown = generate_markdown_report(&dashboard);

        assert!(markdown.contains("# Catalog Analytics Dashboard"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("## Content by Type"));
        assert!(markdown.contains("## Titles Added Over Years"));
        assert!(markdown.contains("## Top 10 Genres"));
        assert!(markdown.contains("## Top 10 Countries by Titles"));
        assert!(markdown.contains("| Rajiv Chilaka | 2 |"));
        assert!(markdown.contains("Kota \\| Factory"));
        assert!(markdown.contains("Rows Without Date Added:** 1"));
    }

    #[test]
    fn test_generate_metadata_section_hides_zero_skips() {
        let dashboard = create_test_dashboard();
        let section = generate_metadata_section(&dashboard.metadata);

        assert!(section.contains("netflix_titles.csv"));
        assert!(!section.contains("Rows Skipped"));
    }

    #[test]
    fn test_empty_rankings() {
        let table = generate_ranking_table("Director", "Titles", &[]);
        assert_eq!(table, "*No director data.*\n\n");
        assert!(generate_years_section(&[]).contains("No dated titles"));
    }

    #[test]
    fn test_generate_json_report() {
        let dashboard = create_test_dashboard();
        let json = generate_json_report(&dashboard).unwrap();

        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["metrics"]["total_titles"], 3);
        assert_eq!(value["top_genres"][0]["label"], "Dramas");
        assert_eq!(value["by_year"][0][0], 2020);
    }
}
