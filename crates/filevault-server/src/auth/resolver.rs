//! Credential, role, and permission resolution.

use std::path::Path;

use anyhow::{Context, Result};

use super::grant::AccessGrant;
use crate::keystore::KeyStore;

/// Owns the three credential stores and resolves identities to grants.
///
/// Constructed once at startup and shared for the process lifetime; the
/// stores are read-mostly and safe for concurrent access.
pub struct CredentialResolver {
    passwords: KeyStore,
    roles: KeyStore,
    permissions: KeyStore,
}

impl CredentialResolver {
    /// Open the password, role, and permission stores under `data_dir`.
    pub fn open(data_dir: &Path) -> Result<Self> {
        Ok(Self {
            passwords: KeyStore::open(data_dir.join("passwords.json"))
                .context("opening password store")?,
            roles: KeyStore::open(data_dir.join("user_roles.json"))
                .context("opening role store")?,
            permissions: KeyStore::open(data_dir.join("permissions.json"))
                .context("opening permission store")?,
        })
    }

    /// The identity's password; empty for unknown identities.
    pub fn password(&self, identity: &str) -> String {
        self.passwords.read(identity)
    }

    /// Resolve an identity through its role to a permission grant.
    ///
    /// An identity with no role, or a role with no permission record, gets
    /// the denied grant.
    pub fn grant(&self, identity: &str) -> AccessGrant {
        let role = self.roles.read(identity);
        AccessGrant::parse(&self.permissions.read(&role))
    }
}
