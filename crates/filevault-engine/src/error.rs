//! Engine error types.

use thiserror::Error;

use crate::record::FileId;

#[derive(Debug, Error)]
pub enum VaultError {
    /// The same content is already stored under the same vault path.
    #[error("Exists")]
    Exists { file_id: FileId },

    #[error("file {0} not found")]
    NotFound(FileId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index error: {0}")]
    Index(String),
}
