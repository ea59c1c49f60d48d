//! Error types for the collection core

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised by collection, persistence and pack operations
#[derive(Error, Debug)]
pub enum DexError {
    /// No card database has been persisted yet; the user has to import one
    #[error("no card database found at {}", .0.display())]
    NotFound(PathBuf),

    /// The persisted database exists but is not valid JSON for a card database
    #[error("stored card database at {} is corrupt: {source}", path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Writing the database to storage failed
    #[error("failed to save card database to {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an export file failed
    #[error("failed to export card database to {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Import(#[from] ImportError),

    /// A mutation addressed a key that is not in the database
    #[error("unknown card: {0}")]
    UnknownCard(String),

    /// A share addressed a pack id that is not on the board
    #[error("unknown pack: {0}")]
    UnknownPack(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Why an import did not produce a database
#[derive(Error, Debug)]
pub enum ImportError {
    /// The user backed out of the file prompt
    #[error("import cancelled")]
    Cancelled,

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("import file is not a valid card database: {0}")]
    Malformed(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DexError>;
