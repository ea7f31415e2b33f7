use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the practice engine
#[derive(Error, Debug)]
pub enum TrainerError {
    /// The dictionary file could not be opened or read
    #[error("unable to read dictionary {path}: {source}")]
    DictionaryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The dictionary contained no usable words
    #[error("dictionary {path} contains no valid words")]
    EmptyDictionary { path: PathBuf },

    /// Malformed input to an ingestion or query operation
    #[error("invalid request: {0}")]
    Validation(String),

    /// Config file given explicitly could not be read or parsed
    #[error("config error: {0}")]
    Config(String),
}

impl TrainerError {
    pub fn validation(msg: impl Into<String>) -> Self {
        TrainerError::Validation(msg.into())
    }

    /// Startup errors abort the process; everything else is per-request
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            TrainerError::DictionaryUnreadable { .. }
                | TrainerError::EmptyDictionary { .. }
                | TrainerError::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, TrainerError>;
