use std::path::PathBuf;

use thiserror::Error;

/// Failures that halt a batch or a single command outright.
///
/// Per-file problems (unreadable file, missing baseline) are not errors at
/// this level; see [`crate::batch::FileOutcome`].
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("log directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path:?} is empty (no header row)")]
    MissingHeader { path: PathBuf },

    #[error("{path:?} header is missing column '{column}'")]
    MissingColumn { path: PathBuf, column: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load config: {0}")]
    Load(#[source] confy::ConfyError),

    #[error("failed to store config: {0}")]
    Store(#[source] confy::ConfyError),

    #[error("failed to resolve config path: {0}")]
    Path(#[source] confy::ConfyError),
}

#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("IO error reading spell table {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse error in spell table {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
