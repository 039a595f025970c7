//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.catalogdash.toml` files.

use crate::cli::OutputFormat;
use crate::models::Theme;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = ".catalogdash.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Input data settings.
    #[serde(default)]
    pub data: DataConfig,

    /// Dashboard settings.
    #[serde(default)]
    pub dashboard: DashboardConfig,

    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
}

/// General application settings.
///
/// When `output` is unset the file name follows the output format.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Output file path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// Input data settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// CSV file to load.
    #[serde(default = "default_input")]
    pub input: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            input: default_input(),
        }
    }
}

fn default_input() -> PathBuf {
    PathBuf::from("netflix_titles.csv")
}

/// Dashboard rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Page heading.
    #[serde(default = "default_title")]
    pub title: String,

    /// Number of entries in each top-N ranking.
    #[serde(default = "default_top_n")]
    pub top_n: usize,

    /// Theme the page opens with.
    #[serde(default)]
    pub theme: Theme,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            top_n: default_top_n(),
            theme: Theme::default(),
        }
    }
}

fn default_title() -> String {
    "Catalog Analytics Dashboard".to_string()
}

fn default_top_n() -> usize {
    10
}

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the server binds to.
    #[serde(default = "default_bind")]
    pub bind: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8501".to_string()
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// Only values the user actually passed override the file.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref input) = args.input {
            self.data.input = input.clone();
        }
        if let Some(ref output) = args.output {
            self.general.output = Some(output.clone());
        }
        if let Some(top) = args.top {
            self.dashboard.top_n = top;
        }
        if let Some(theme) = args.theme {
            self.dashboard.theme = theme;
        }
        if let Some(ref title) = args.title {
            self.dashboard.title = title.clone();
        }
        if let Some(ref bind) = args.bind {
            self.server.bind = bind.clone();
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Path the report is written to for `format`.
    pub fn output_path(&self, format: OutputFormat) -> PathBuf {
        self.general
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(format.default_file_name()))
    }

    /// Check values that serde cannot constrain.
    pub fn validate(&self) -> Result<()> {
        if self.dashboard.top_n == 0 {
            anyhow::bail!("dashboard.top_n must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.input, PathBuf::from("netflix_titles.csv"));
        assert_eq!(config.dashboard.top_n, 10);
        assert_eq!(config.dashboard.theme, Theme::Dark);
        assert_eq!(config.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "out/report.md"
verbose = true

[data]
input = "data/titles.csv"

[dashboard]
top_n = 5
theme = "light"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, Some(PathBuf::from("out/report.md")));
        assert!(config.general.verbose);
        assert_eq!(config.data.input, PathBuf::from("data/titles.csv"));
        assert_eq!(config.dashboard.top_n, 5);
        assert_eq!(config.dashboard.theme, Theme::Light);
        assert_eq!(config.dashboard.title, "Catalog Analytics Dashboard");
        assert_eq!(config.server.bind, "127.0.0.1:8501");
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        config.dashboard.top_n = 5;

        let mut args = make_args();
        args.input = Some(PathBuf::from("other.csv"));
        args.theme = Some(Theme::Light);
        config.merge_with_args(&args);

        assert_eq!(config.data.input, PathBuf::from("other.csv"));
        assert_eq!(config.dashboard.theme, Theme::Light);
        // Not passed on the command line
        assert_eq!(config.dashboard.top_n, 5);
    }

    #[test]
    fn test_output_path_defaults_by_format() {
        let mut config = Config::default();
        assert_eq!(
            config.output_path(OutputFormat::Json),
            PathBuf::from("catalog_dashboard.json")
        );
        assert_eq!(
            config.output_path(OutputFormat::Markdown),
            PathBuf::from("catalog_dashboard.md")
        );
        assert_eq!(
            config.output_path(OutputFormat::Html),
            PathBuf::from("catalog_dashboard.html")
        );

        // An explicit path is kept whatever the format
        let mut args = make_args();
        args.output = Some(PathBuf::from("report.txt"));
        config.merge_with_args(&args);
        assert_eq!(config.output_path(OutputFormat::Json), PathBuf::from("report.txt"));
    }

    #[test]
    fn test_verbose_from_config_file() {
        let config: Config = toml::from_str("[general]\nverbose = true\n").unwrap();
        let args = make_args();
        assert_eq!(args.log_level(config.general.verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let mut config = Config::default();
        config.dashboard.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[data]"));
        assert!(toml_str.contains("[dashboard]"));
        assert!(toml_str.contains("[server]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.dashboard.top_n, 10);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join(DEFAULT_CONFIG_FILE);
        std::fs::write(&path, "[server]\nbind = \"0.0.0.0:9000\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.server.bind, "0.0.0.0:9000");
    }
}
