//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.manet-analyzer.toml` files.

use crate::cli::ReportFormat;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Protocols analyzed when neither CLI nor config specifies a set.
pub const DEFAULT_PROTOCOLS: [&str; 4] = ["AODV", "OLSR", "DSR", "DSDV"];

/// Default config file name, looked up in the working directory.
pub const CONFIG_FILE: &str = ".manet-analyzer.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Analysis input settings.
    #[serde(default)]
    pub analysis: AnalysisConfig,

    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,

    /// Chart output settings.
    #[serde(default)]
    pub plots: PlotsConfig,
}

/// Analysis input settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Protocol names to analyze; one `<NAME>-OUTPUT.csv` file each.
    #[serde(default = "default_protocols")]
    pub protocols: Vec<String>,

    /// Directory containing the input files.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            protocols: default_protocols(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_protocols() -> Vec<String> {
    DEFAULT_PROTOCOLS.iter().map(|p| p.to_string()).collect()
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Report output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Report file path.
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Report file format. Console output is always text.
    #[serde(default)]
    pub format: ReportFormat,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output: default_output(),
            format: ReportFormat::default(),
        }
    }
}

fn default_output() -> PathBuf {
    PathBuf::from("statistics_summary.txt")
}

/// Chart output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlotsConfig {
    /// Whether to render charts at all.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Directory for the image artifacts.
    #[serde(default = "default_plots_dir")]
    pub dir: PathBuf,
}

impl Default for PlotsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_plots_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_plots_dir() -> PathBuf {
    PathBuf::from("plots")
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
        let default_path = Path::new(CONFIG_FILE);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings; only
    /// explicitly provided values override.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref protocols) = args.protocols {
            self.analysis.protocols = protocols.clone();
        }
        if let Some(ref data_dir) = args.data_dir {
            self.analysis.data_dir = data_dir.clone();
        }
        if let Some(ref output) = args.output {
            self.report.output = output.clone();
        }
        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(ref plots_dir) = args.plots_dir {
            self.plots.dir = plots_dir.clone();
        }
        if args.no_plots {
            self.plots.enabled = false;
        }
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

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.analysis.protocols, default_protocols());
        assert_eq!(config.report.output, PathBuf::from("statistics_summary.txt"));
        assert_eq!(config.plots.dir, PathBuf::from("plots"));
        assert!(config.plots.enabled);
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[analysis]
protocols = ["AODV", "OLSR"]
data_dir = "results"

[report]
output = "summary.txt"
format = "json"

[plots]
enabled = false
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.analysis.protocols, vec!["AODV", "OLSR"]);
        assert_eq!(config.analysis.data_dir, PathBuf::from("results"));
        assert_eq!(config.report.output, PathBuf::from("summary.txt"));
        assert_eq!(config.report.format, ReportFormat::Json);
        assert!(!config.plots.enabled);
        // Unspecified fields keep their defaults.
        assert_eq!(config.plots.dir, PathBuf::from("plots"));
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[analysis]"));
        assert!(toml_str.contains("[report]"));
        assert!(toml_str.contains("[plots]"));
        assert!(toml_str.contains("AODV"));
    }

    #[test]
    fn test_merge_with_args_overrides() {
        use crate::cli::Args;

        let mut config = Config::default();
        let mut args = Args::default();
        args.protocols = Some(vec!["AODV".to_string()]);
        args.data_dir = Some(PathBuf::from("run-42"));
        args.no_plots = true;

        config.merge_with_args(&args);

        assert_eq!(config.analysis.protocols, vec!["AODV"]);
        assert_eq!(config.analysis.data_dir, PathBuf::from("run-42"));
        assert!(!config.plots.enabled);
        // Untouched settings survive the merge.
        assert_eq!(config.report.output, PathBuf::from("statistics_summary.txt"));
    }
}
