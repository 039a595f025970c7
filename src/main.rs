//! catalogdash - Streaming catalog analytics dashboard
//!
//! A CLI tool that loads a catalog CSV export, cleans it and renders
//! summary metrics, charts and top-N tables as a self-contained HTML
//! page, Markdown or JSON, or serves the dashboard over HTTP.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (unreadable file, missing columns, bad config, etc.)

mod analysis;
mod cli;
mod config;
mod loader;
mod models;
mod report;
mod server;

use analysis::{build_dashboard, DashboardOptions};
use anyhow::{Context, Result};
use cli::{Args, OutputFormat};
use config::{Config, DEFAULT_CONFIG_FILE};
use std::net::SocketAddr;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Config is resolved first so `[general] verbose` can pick the log level
    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };

    init_logging(&args, &config);

    info!("catalogdash v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    debug!("Resolved config: {:?}", config);

    let result = if args.serve {
        run_server(config).await
    } else {
        run_report(&args, config)
    };

    if let Err(e) = result {
        error!("Dashboard failed: {:#}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .catalogdash.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(DEFAULT_CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            DEFAULT_CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", DEFAULT_CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", DEFAULT_CONFIG_FILE);
    println!("   Edit it to change the input file, title, top-N size and theme.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args, config: &Config) {
    let level = args.log_level(config.general.verbose);

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load the configuration file and apply CLI overrides.
fn resolve_config(args: &Args) -> Result<Config> {
    let mut config = load_config(args)?;
    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}

/// Build the dashboard once and write it to disk.
fn run_report(args: &Args, config: Config) -> Result<()> {
    let start_time = Instant::now();

    println!("📥 Loading catalog: {}", config.data.input.display());
    let catalog = loader::load_catalog(&config.data.input)
        .with_context(|| format!("Failed to load {}", config.data.input.display()))?;

    if catalog.rows_skipped > 0 {
        warn!("{} malformed rows were skipped", catalog.rows_skipped);
    }

    println!("📊 Building dashboard...");
    let options = DashboardOptions {
        title: config.dashboard.title.clone(),
        source: config.data.input.display().to_string(),
        top_n: config.dashboard.top_n,
    };
    let dashboard = build_dashboard(&catalog, &options);

    let output = match args.format {
        OutputFormat::Html => report::render_html(
            &dashboard,
            report::HtmlOptions {
                theme: config.dashboard.theme,
                live: false,
            },
        ),
        OutputFormat::Markdown => report::generate_markdown_report(&dashboard),
        OutputFormat::Json => report::generate_json_report(&dashboard)?,
    };

    let path = &config.output_path(args.format);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    std::fs::write(path, &output)
        .with_context(|| format!("Failed to write dashboard to {}", path.display()))?;

    println!("\n{}", report::generate_console_summary(&dashboard));
    println!("   Duration: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("\n✅ Dashboard saved to: {}", path.display());

    Ok(())
}

/// Serve the dashboard over HTTP.
async fn run_server(config: Config) -> Result<()> {

    let addr: SocketAddr = config
        .server
        .bind
        .parse()
        .with_context(|| format!("Invalid bind address: {}", config.server.bind))?;

    // Fail fast on a bad input file instead of on the first request
    loader::load_catalog(&config.data.input)
        .with_context(|| format!("Failed to load {}", config.data.input.display()))?;

    println!("🌐 Dashboard available at http://{}", addr);

    let state = server::AppState {
        input: config.data.input.clone(),
        title: config.dashboard.title.clone(),
        top_n: config.dashboard.top_n,
        default_theme: config.dashboard.theme,
    };

    server::serve(addr, state).await
}

/// Load configuration from file or use defaults.
///
/// Runs before the subscriber is installed, so problems go to stderr.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok(config),
        Ok(None) => Ok(Config::default()),
        Err(e) => {
            eprintln!("⚠️  Failed to load {}: {:#}", DEFAULT_CONFIG_FILE, e);
            Ok(Config::default())
        }
    }
}
