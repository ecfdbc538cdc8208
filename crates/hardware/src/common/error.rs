//! Error definitions.
//!
//! Every failure in this crate happens before a predictor exists: a bad
//! configuration, an unreadable file, or malformed JSON. Once a unit has been
//! built, `predict` and `update` are total and never fail.

use std::path::PathBuf;

use thiserror::Error;

/// A configuration value that cannot be turned into predictor state.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A table size that is not a power of two.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending configuration field.
        field: &'static str,
        /// Value that was supplied.
        value: usize,
    },

    /// A history length below one bit.
    #[error("history_length must be at least 1, got {0}")]
    HistoryTooShort(usize),

    /// A history length above what the variant can hold.
    #[error("history_length {value} exceeds the maximum of {max} for {variant}")]
    HistoryTooLong {
        /// Value that was supplied.
        value: usize,
        /// Largest accepted value.
        max: usize,
        /// Variant that imposed the limit.
        variant: &'static str,
    },

    /// A perceptron weight narrower than two bits or wider than sixteen.
    #[error("weight_bits must be in 2..={max}, got {value}")]
    WeightBits {
        /// Value that was supplied.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A direction counter width outside the supported range.
    #[error("counter_bits must be in 1..={max}, got {value}")]
    CounterBits {
        /// Value that was supplied.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A table index width outside the supported range.
    #[error("{field} must be in 1..={max}, got {value}")]
    IndexBits {
        /// Name of the offending configuration field.
        field: &'static str,
        /// Value that was supplied.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },

    /// A preset name that does not exist.
    #[error("unknown predictor preset '{0}'")]
    UnknownPreset(String),
}

/// Crate-level error for loading configurations and traces.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration was rejected.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The input was not valid JSON for the expected type.
    #[error("malformed JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A file could not be read.
    #[error("could not read '{}': {source}", path.display())]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}
