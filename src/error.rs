use std::path::PathBuf;
use thiserror::Error;

use crate::subprocess::ProcessError;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid glob pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("AI returned an unusable result: {0}")]
    SchemaMismatch(String),

    #[error("No files matched {}", .0.join(", "))]
    NoFilesMatched(Vec<String>),

    #[error("AI returned a malformed response: unresolved placeholder(s) {}", .placeholders.join(", "))]
    UnresolvedPlaceholders { placeholders: Vec<String> },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Process error: {0}")]
    Process(#[from] ProcessError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("TOML error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
