//! Dataset loading for per-protocol simulation logs.
//!
//! One CSV file per protocol, conventionally named `<PROTOCOL>-OUTPUT.csv`.
//! A missing file drops that protocol with a warning and the run
//! continues; a file that is present but violates the column contract
//! aborts the run before any statistics are produced.

use crate::models::{Sample, TimeSeries};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Columns every input file must carry.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Time",
    "ThroughputKbps",
    "PDR",
    "AvgDelay",
    "RoutingOverhead",
    "PacketsReceived",
];

/// Errors from the loading step.
#[derive(Debug, Error)]
pub enum LoadError {
    /// Every requested protocol's input file was absent or unreadable.
    #[error("no input files found in {}", dir.display())]
    AllSourcesMissing { dir: PathBuf },

    /// An input file is present but lacks a required column.
    #[error("{protocol}: {} is missing required column '{column}'", file.display())]
    MissingColumn {
        protocol: String,
        file: PathBuf,
        column: String,
    },

    /// An input file is present but could not be parsed.
    #[error("{protocol}: failed to parse {}", file.display())]
    Malformed {
        protocol: String,
        file: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Outcome of the loading step: parsed datasets in request order, plus
/// the protocols that were dropped because their file was absent.
///
/// The requested protocol list itself is never mutated; callers decide
/// what to do with the dropped names.
#[derive(Debug, Default)]
pub struct LoadedData {
    pub datasets: Vec<(String, TimeSeries)>,
    pub dropped: Vec<String>,
}

impl LoadedData {
    /// Names of the protocols that loaded successfully, in request order.
    pub fn protocols(&self) -> Vec<&str> {
        self.datasets.iter().map(|(name, _)| name.as_str()).collect()
    }
}

/// Path of a protocol's input file under `dir`.
pub fn dataset_path(dir: &Path, protocol: &str) -> PathBuf {
    dir.join(format!("{protocol}-OUTPUT.csv"))
}

/// Load every requested protocol's dataset from `dir`.
///
/// Partial failure is tolerated: absent or unreadable files drop their
/// protocol. The run fails only when nothing loads at all, or when a
/// present file is malformed.
pub fn load_datasets(dir: &Path, protocols: &[String]) -> Result<LoadedData, LoadError> {
    let mut loaded = LoadedData::default();

    for protocol in protocols {
        let path = dataset_path(dir, protocol);
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                warn!("{}: cannot read {} ({}), dropping", protocol, path.display(), e);
                loaded.dropped.push(protocol.clone());
                continue;
            }
        };

        let series = parse_series(file, &path, protocol)?;
        debug!("{}: {} samples from {}", protocol, series.len(), path.display());
        loaded.datasets.push((protocol.clone(), series));
    }

    if loaded.datasets.is_empty() {
        return Err(LoadError::AllSourcesMissing {
            dir: dir.to_path_buf(),
        });
    }

    Ok(loaded)
}

/// Parse one protocol's CSV stream, enforcing the column contract.
fn parse_series<R: Read>(input: R, path: &Path, protocol: &str) -> Result<TimeSeries, LoadError> {
    let malformed = |source: csv::Error| LoadError::Malformed {
        protocol: protocol.to_string(),
        file: path.to_path_buf(),
        source,
    };

    let mut reader = csv::Reader::from_reader(input);

    let headers = reader.headers().map_err(malformed)?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoadError::MissingColumn {
                protocol: protocol.to_string(),
                file: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }

    let mut samples = Vec::new();
    for record in reader.deserialize::<Sample>() {
        samples.push(record.map_err(malformed)?);
    }

    Ok(TimeSeries::new(samples))
}
