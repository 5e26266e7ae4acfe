//! Errors raised while loading the data file

use std::path::PathBuf;
use thiserror::Error;

/// Data file loading errors
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("Failed to read data file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid data file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
