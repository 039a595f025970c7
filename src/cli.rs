//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::Theme;
use clap::Parser;
use std::path::PathBuf;

/// catalogdash - analytics dashboard for streaming catalog exports
///
/// Loads a catalog CSV (type, title, director, country, date_added,
/// listed_in) and renders metrics, charts and top-N tables as a
/// self-contained HTML page, Markdown or JSON, or serves it over HTTP.
///
/// Examples:
///   catalogdash --input netflix_titles.csv
///   catalogdash --input netflix_titles.csv --format markdown -o report.md
///   catalogdash --serve --bind 0.0.0.0:8501
///   catalogdash --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Catalog CSV file to load
    ///
    /// Default: from config or netflix_titles.csv.
    #[arg(short, long, value_name = "FILE", env = "CATALOGDASH_INPUT")]
    pub input: Option<PathBuf>,

    /// Output file path for the dashboard
    ///
    /// Default: from config or catalog_dashboard.html.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (html, markdown, json)
    #[arg(long, default_value = "html", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Theme the page opens with (dark, light)
    #[arg(long, value_name = "THEME")]
    pub theme: Option<Theme>,

    /// Number of entries in each top-N ranking
    #[arg(short = 'n', long, value_name = "N")]
    pub top: Option<usize>,

    /// Page heading
    #[arg(long, value_name = "TEXT")]
    pub title: Option<String>,

    /// Serve the dashboard over HTTP instead of writing a file
    #[arg(long)]
    pub serve: bool,

    /// Address for --serve
    #[arg(long, value_name = "ADDR", env = "CATALOGDASH_BIND")]
    pub bind: Option<String>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .catalogdash.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .catalogdash.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Self-contained HTML page (default)
    #[default]
    Html,
    /// Markdown tables
    Markdown,
    /// JSON document
    Json,
}

impl OutputFormat {
    /// File written when no output path is given.
    pub fn default_file_name(&self) -> &'static str {
        match self {
            OutputFormat::Html => "catalog_dashboard.html",
            OutputFormat::Markdown => "catalog_dashboard.md",
            OutputFormat::Json => "catalog_dashboard.json",
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(0) = self.top {
            return Err("Top N must be at least 1".to_string());
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.serve && self.output.is_some() {
            return Err("--output has no effect with --serve".to_string());
        }

        if let Some(ref bind) = self.bind {
            if bind.parse::<std::net::SocketAddr>().is_err() {
                return Err(format!("Invalid bind address: {}", bind));
            }
        }

        if let Some(ref input) = self.input {
            if input.is_dir() {
                return Err(format!("Input path is a directory: {}", input.display()));
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    ///
    /// `config_verbose` is the `[general] verbose` setting; `--quiet` wins over it.
    pub fn log_level(&self, config_verbose: bool) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose || config_verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
