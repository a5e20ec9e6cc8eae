//! Per-request ephemeral session identifiers.

use uuid::Uuid;

/// Unique id for one in-flight request.
///
/// Staged temp-file names are keyed on it, so concurrent extract/import
/// operations never collide on disk.
#[derive(Debug, Clone)]
pub struct Session(String);

impl Session {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn id(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sessions_are_unique() {
        assert_ne!(Session::generate().id(), Session::generate().id());
    }
}
