//! MANET Analyzer - routing protocol performance analysis
//!
//! A CLI tool that loads per-protocol CSV logs produced by network
//! simulations, computes summary statistics, writes a comparison report,
//! and renders comparison charts.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (no input data, malformed input, I/O failure)

mod cli;
mod config;
mod loader;
mod models;
mod plot;
mod report;
mod stats;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, ReportFormat};
use config::Config;
use models::ProtocolStats;
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
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

    // Initialize logging
    init_logging(&args);

    info!("manet-analyzer v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run_analysis(&args) {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Analysis failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .manet-analyzer.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(config::CONFIG_FILE);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            config::CONFIG_FILE
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", config::CONFIG_FILE))?;

    println!("✅ Created {} with default settings.", config::CONFIG_FILE);
    println!("   Edit it to customize protocols, paths, and output format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis pipeline: load, aggregate, report, plot.
fn run_analysis(args: &Args) -> Result<()> {
    let start_time = Instant::now();

    // Load configuration
    let mut config = load_config(args)?;
    config.merge_with_args(args);

    // Step 1: Load the datasets
    println!(
        "📥 Loading data files from {}...",
        config.analysis.data_dir.display()
    );
    let data = loader::load_datasets(&config.analysis.data_dir, &config.analysis.protocols)?;
    debug!("Active protocols: {:?}", data.protocols());

    for (protocol, series) in &data.datasets {
        println!("   ✓ {}: {} samples", protocol, series.len());
    }
    for protocol in &data.dropped {
        println!(
            "   ✗ {}: {} not found, skipped",
            protocol,
            loader::dataset_path(&config.analysis.data_dir, protocol).display()
        );
    }

    // Step 2: Aggregate each series into summary statistics
    println!("\n🧮 Calculating statistics...");
    let stats: Vec<(String, ProtocolStats)> = data
        .datasets
        .iter()
        .map(|(protocol, series)| (protocol.clone(), stats::summarize(series)))
        .collect();

    // Step 3: Render the report, console first
    let generated = Utc::now();
    let text = report::render_text(&stats, generated);
    print!("\n{}", text);

    let content = match config.report.format {
        ReportFormat::Text => text,
        ReportFormat::Json => report::render_json(&stats, generated)?,
    };
    report::write_report(&config.report.output, &content)?;
    println!("\n💾 Report saved to: {}", config.report.output.display());

    // Step 4: Render the comparison charts
    if config.plots.enabled {
        println!(
            "\n🖼️  Generating plots in {}...",
            config.plots.dir.display()
        );
        plot::render_all(&data, &stats, &config.plots.dir)?;
        for artifact in plot::ARTIFACTS {
            println!("   ✓ {}", config.plots.dir.join(artifact).display());
        }
    }

    println!(
        "\n✅ Analysis complete in {:.1}s",
        start_time.elapsed().as_secs_f64()
    );
    Ok(())
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", config::CONFIG_FILE);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
