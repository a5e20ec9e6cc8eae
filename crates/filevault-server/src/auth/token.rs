//! Capability-token validation.

use sha2::{Digest, Sha256};

use super::{AccessGrant, CredentialResolver};

/// Validates three-part capability tokens against per-identity passwords.
pub struct Authenticator {
    resolver: CredentialResolver,
}

impl Authenticator {
    pub fn new(resolver: CredentialResolver) -> Self {
        Self { resolver }
    }

    /// Validate `token` for the given signing context.
    ///
    /// The token is `identity/nonce/signature` with
    /// `signature = hex(SHA256(context + nonce + password))`. The context is
    /// the command name plus its primary argument, so a token is bound to
    /// one exact operation and cannot be replayed against another command or
    /// argument. The nonce is client-chosen and not tracked server-side: an
    /// intercepted token can replay its exact request until the password
    /// changes.
    ///
    /// Every failure mode returns the denied grant; callers surface it as a
    /// single unauthorized response.
    pub fn authorize(&self, token: &str, context: &str) -> AccessGrant {
        let parts: Vec<&str> = token.split('/').collect();
        let &[identity, nonce, signature] = parts.as_slice() else {
            return AccessGrant::denied();
        };

        // An unknown identity reads an empty password and fails the
        // comparison below; there is no distinguishable "unknown user"
        // branch.
        let password = self.resolver.password(identity);
        let expected = sha256_hex(&format!("{context}{nonce}{password}"));
        if expected != signature {
            tracing::debug!("Signature mismatch for identity {}", identity);
            return AccessGrant::denied();
        }

        self.resolver.grant(identity)
    }
}

/// Lowercase-hex SHA-256 of a string.
pub fn sha256_hex(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
}
