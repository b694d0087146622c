//! Error types for net/dev collection.
//!
//! Every failure is returned to the caller unchanged; nothing here is retried
//! and no partial statistics table survives an error.

use std::io;
use std::path::PathBuf;

/// Errors raised while locating, reading, parsing or exporting net/dev data.
#[derive(Debug, thiserror::Error)]
pub enum NetDevError {
    #[error("failed to resolve {path}: {source}")]
    PathResolution {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid header line in net/dev: {0}")]
    InvalidHeader(String),

    #[error("invalid line in net/dev: {0}")]
    InvalidLine(String),

    #[error("failed to read net/dev: {0}")]
    Read(#[from] io::Error),

    #[error("invalid ignored-devices pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid value {value} in netstats for {device}/{metric}")]
    InvalidValue {
        device: String,
        metric: String,
        value: String,
    },

    #[error("metrics registry error: {0}")]
    Registry(String),
}

impl From<prometheus::Error> for NetDevError {
    fn from(e: prometheus::Error) -> Self {
        NetDevError::Registry(e.to_string())
    }
}
