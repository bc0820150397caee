//! Credential traits: password hashing and access-token signing.
//!
//! Defined in axis-core so the auth service never couples to a specific
//! algorithm. The argon2 and JWT adapters live in axis-infra.

use axis_types::error::{CredentialError, TokenError};
use axis_types::user::{AccessToken, TokenClaims};
use uuid::Uuid;

/// Abstraction over password hashing.
///
/// Calls are CPU-bound; the auth service runs them on the blocking pool.
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` into a self-describing string (salt and parameters included).
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;

    /// Check `password` against a hash produced by [`Self::hash_password`].
    fn verify_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
}

/// Abstraction over signed access tokens.
pub trait TokenIssuer: Send + Sync {
    fn issue(&self, user_id: Uuid) -> Result<AccessToken, TokenError>;

    /// Check signature and expiry and return the claims.
    fn verify(&self, token: &str) -> Result<TokenClaims, TokenError>;
}
