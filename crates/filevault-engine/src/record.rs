//! File records and listing entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier assigned to an imported file. Ids start at 1; 0 is never
/// issued.
pub type FileId = u64;

/// Everything the store knows about one file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    pub file_id: FileId,
    /// Full vault path, e.g. `/docs/report.pdf`.
    pub path: String,
    /// Final path component, used as the delivery name.
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub size: u64,
    /// Lowercase-hex SHA-256 of the content.
    pub hash: String,
}

/// One row of a listing or query result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub file_id: FileId,
    pub path: String,
}
