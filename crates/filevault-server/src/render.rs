//! Plain-text response rows.

use filevault_engine::FileId;

/// Standard result row: width-10 id, colon, value.
pub fn row(file_id: FileId, text: &str) -> String {
    format!("{file_id:>10}: {text}\n")
}

/// Row for content that was already stored; the `+` marks the no-op.
pub fn existing_row(file_id: FileId, text: &str) -> String {
    format!("{file_id:>10}+ {text}\n")
}

/// Bare id row (exist results).
pub fn id_row(file_id: FileId) -> String {
    format!("{file_id:>10}\n")
}
