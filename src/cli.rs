//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::config::DEFAULT_PROTOCOLS;

/// MANET Analyzer - performance analysis for routing protocol simulations
///
/// Loads per-protocol CSV logs (`<PROTOCOL>-OUTPUT.csv`), computes summary
/// statistics, writes a comparison report, and renders comparison charts.
/// Run without arguments to analyze AODV, OLSR, DSR and DSDV logs from the
/// current directory.
///
/// Examples:
///   manet-analyzer
///   manet-analyzer --protocols AODV,OLSR --data-dir results/run-3
///   manet-analyzer -o summary.txt --plots-dir figures
///   manet-analyzer --format json --no-plots
///   manet-analyzer --init-config
#[derive(Parser, Debug, Clone, Default)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Protocol names to analyze (comma-separated)
    ///
    /// One `<NAME>-OUTPUT.csv` file per protocol is expected in the data
    /// directory. Defaults to AODV,OLSR,DSR,DSDV.
    #[arg(short, long, value_name = "NAMES", value_delimiter = ',')]
    pub protocols: Option<Vec<String>>,

    /// Directory containing the input CSV files
    #[arg(long, value_name = "DIR", env = "MANET_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output file path for the statistics report
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Directory for the generated chart images
    #[arg(long, value_name = "DIR")]
    pub plots_dir: Option<PathBuf>,

    /// Skip chart generation entirely
    #[arg(long)]
    pub no_plots: bool,

    /// Report file format (text, json)
    ///
    /// Console output is always text.
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<ReportFormat>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .manet-analyzer.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .manet-analyzer.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Report file format.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Plain text (default), identical to the console output
    #[default]
    Text,
    /// JSON
    Json,
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

        if let Some(ref protocols) = self.protocols {
            if protocols.is_empty() || protocols.iter().any(|p| p.trim().is_empty()) {
                return Err("Protocol list must not contain empty names".to_string());
            }
        }

        if let Some(ref data_dir) = self.data_dir {
            if !data_dir.exists() {
                return Err(format!(
                    "Data directory does not exist: {}",
                    data_dir.display()
                ));
            }
            if !data_dir.is_dir() {
                return Err(format!(
                    "Data path is not a directory: {}",
                    data_dir.display()
                ));
            }
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Returns the effective protocol list when no config file is in play.
    #[allow(dead_code)] // Utility for callers bypassing the config layer
    pub fn effective_protocols(&self) -> Vec<String> {
        self.protocols.clone().unwrap_or_else(|| {
            DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect()
        })
    }
}
