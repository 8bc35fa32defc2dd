use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ForcesError {
    /// A lookup or page fragment that the caller could not proceed without.
    #[error("{0} not found")]
    NotFound(String),

    /// The page no longer matches the structure the extractors expect.
    #[error("malformed page: {0}")]
    Malformed(String),

    #[error("invalid problem id '{0}'")]
    InvalidId(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("template error: {0}")]
    Template(String),

    #[error("failed to run '{command}': {detail}")]
    Process { command: String, detail: String },

    #[error("session has no problems; run `forces train <contest>` first")]
    EmptySession,
}

impl ForcesError {
    pub fn file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ForcesError::File {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ForcesError>;
