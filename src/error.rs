//! Error taxonomy shared by the loaders, the numeric core, and the binary.

use thiserror::Error;

pub use crate::config::ConfigError;

/// Any failure raised while preparing or running a heat-pump analysis.
///
/// Failures are deterministic functions of the inputs; none of them is
/// worth retrying.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or missing purchase, temperature, or catalog records.
    #[error("data error: {0}")]
    Data(String),
    /// Invalid configuration or an unusable heat-pump selection.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// A quantity the analysis depends on is undefined for these inputs.
    #[error("computation error: {0}")]
    Computation(String),
    /// The run was cancelled between hourly steps.
    #[error("analysis cancelled")]
    Cancelled,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn data(message: impl Into<String>) -> Self {
        Self::Data(message.into())
    }

    pub(crate) fn computation(message: impl Into<String>) -> Self {
        Self::Computation(message.into())
    }

    pub(crate) fn config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Config(ConfigError {
            field: field.into(),
            message: message.into(),
        })
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
