//! Storage error surface shared by snapshot store backends.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Error raised by snapshot store backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O failed for {path}: {source}")]
    Io {
        /// File the operation targeted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The snapshot could not be encoded to JSON.
    #[error("failed to encode score snapshot: {source}")]
    Encode {
        /// Underlying serializer error.
        #[source]
        source: serde_json::Error,
    },
    /// The persisted file does not contain a valid snapshot.
    #[error("failed to decode score snapshot from {path}: {source}")]
    Decode {
        /// File that failed to parse.
        path: PathBuf,
        /// Underlying deserializer error.
        #[source]
        source: serde_json::Error,
    },
}
