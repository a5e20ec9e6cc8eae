//! Content-addressed file storage engine.
//!
//! Stores file content once per SHA-256 hash under an objects directory and
//! tracks the vault paths referencing it in a JSON index. The [`Vault`] trait
//! is the seam the protocol layer programs against; [`FileVault`] is the
//! filesystem implementation.

mod error;
mod record;
mod store;

pub use error::VaultError;
pub use record::{Entry, FileId, FileRecord};
pub use store::FileVault;

use std::path::Path;

use chrono::{DateTime, Utc};

/// Storage-engine contract consumed by the protocol layer.
#[async_trait::async_trait]
pub trait Vault: Send + Sync {
    /// Verify index/object consistency. Returns one report line per fault;
    /// an empty report means the store is clean.
    async fn check(&self) -> Result<Vec<String>, VaultError>;

    /// Import the file at `local` under the vault path `name`.
    ///
    /// Fails with [`VaultError::Exists`] (carrying the existing id) when the
    /// same content is already stored under the same vault path. The same
    /// content under a new path gets a fresh record; the stored object is
    /// shared.
    async fn import(
        &self,
        local: &Path,
        name: &str,
        timestamp: DateTime<Utc>,
    ) -> Result<FileId, VaultError>;

    /// Materialize a file's content at `dest`. Returns the bytes written.
    async fn extract(&self, file_id: FileId, dest: &Path) -> Result<u64, VaultError>;

    /// Look up a single file record.
    async fn info(&self, file_id: FileId) -> Result<FileRecord, VaultError>;

    /// List files whose vault path starts with `path`, ascending by id.
    async fn list_path(&self, path: &str) -> Result<Vec<Entry>, VaultError>;

    /// List files storing content with this hash.
    async fn list_hash(&self, hash: &str) -> Result<Vec<Entry>, VaultError>;

    /// Search vault paths for whitespace-separated terms; every term must
    /// match case-insensitively.
    async fn query(&self, terms: &str) -> Result<Vec<Entry>, VaultError>;

    /// Exact-path lookup returning every matching file id.
    async fn query_filename(&self, name: &str) -> Result<Vec<FileId>, VaultError>;
}
