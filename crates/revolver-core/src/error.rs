use std::path::PathBuf;
use thiserror::Error;

/// Core error type for revolver configuration and setup.
///
/// Resolution itself never fails: every miss is a deferral to the host.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("No revolver.json found from {start}")]
    ConfigNotFound { start: PathBuf },

    #[error("directoryList must contain at least one directory")]
    EmptyDirectoryList,

    #[error("Invalid {field} pattern `{pattern}`: {source}")]
    InvalidPattern {
        field: &'static str,
        pattern: String,
        #[source]
        source: regex_lite::Error,
    },

    #[error("Directory name `{name}` is used by more than one entry")]
    DuplicateDirectoryName { name: String },

    #[error("nextDirectoryPrefix must not be empty")]
    EmptyNextDirectoryPrefix,
}
