//! Configuration and trace loading.
//!
//! Both files are JSON: a [`PredictorConfig`] object, or an array of
//! [`BranchRecord`] objects.

use std::fs;
use std::path::Path;

use crate::common::Error;
use crate::config::PredictorConfig;
use crate::sim::trace::BranchRecord;

/// Reads a file into a string, attaching the path to any I/O error.
fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates a predictor configuration.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read, [`Error::Parse`] if it is
/// not a valid configuration object, and [`Error::Config`] if validation fails.
pub fn load_config(path: impl AsRef<Path>) -> Result<PredictorConfig, Error> {
    PredictorConfig::from_json(&read(path.as_ref())?)
}

/// Loads a branch trace.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Parse`] if it
/// is not an array of branch records.
pub fn load_trace(path: impl AsRef<Path>) -> Result<Vec<BranchRecord>, Error> {
    Ok(serde_json::from_str(&read(path.as_ref())?)?)
}
