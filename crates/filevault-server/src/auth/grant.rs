//! Typed permission grants parsed from role permission records.

/// What a caller may do, resolved from its role.
///
/// A grant with an empty root directory denies everything. Reading is
/// implied by having a scope at all; writing requires the `w` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    /// Directory prefix the caller is confined to. Empty means denied.
    pub root_dir: String,
    /// Whether write-class operations (import) are allowed.
    pub can_write: bool,
}

impl AccessGrant {
    /// The grant that denies every operation.
    pub fn denied() -> Self {
        Self {
            root_dir: String::new(),
            can_write: false,
        }
    }

    /// Parse a `"rootDir,flags"` permission record.
    ///
    /// The first comma-separated field is the root directory; the second
    /// grants write access iff it contains a `w` (case-insensitive). A
    /// missing flags field yields a read-only grant; an empty root directory
    /// yields the denied grant regardless of flags.
    pub fn parse(record: &str) -> Self {
        let mut fields = record.splitn(2, ',');
        let root_dir = fields.next().unwrap_or_default().to_string();
        if root_dir.is_empty() {
            return Self::denied();
        }
        let can_write = fields
            .next()
            .map(|flags| flags.to_lowercase().contains('w'))
            .unwrap_or(false);
        Self { root_dir, can_write }
    }

    pub fn is_denied(&self) -> bool {
        self.root_dir.is_empty()
    }

    /// Scope containment: literal prefix match against the root directory.
    pub fn contains(&self, path: &str) -> bool {
        !self.root_dir.is_empty() && path.starts_with(&self.root_dir)
    }
}
