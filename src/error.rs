// File: src/error.rs
use std::path::PathBuf;
use thiserror::Error;

/// All failure modes of the phonemizer.
///
/// Configuration problems are fatal at startup; an unhandled rule context is
/// fatal for the computation that hit it and carries the offending location
/// so the gap in rule coverage can be reported precisely.
#[derive(Debug, Error)]
pub enum PhonemizerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed table {path}: {source}")]
    MalformedTable {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid phoneme configuration: {0}")]
    Config(String),

    #[error("invalid reference '{0}'")]
    InvalidReference(String),

    #[error("invalid stop type '{0}'")]
    InvalidStopType(String),

    #[error("unhandled rule context at {location}: {detail}")]
    RuleGap { location: String, detail: String },
}

pub type Result<T> = std::result::Result<T, PhonemizerError>;
