use async_trait::async_trait;

use crate::CoreResult;

/// One-way credential hashing.
///
/// Implementations may be slow on purpose; callers must not hold any store lock across
/// these calls.
#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Hash a plaintext secret into an opaque, self-describing string.
    async fn hash(&self, secret: &str) -> CoreResult<String>;

    /// Check a plaintext secret against a hash previously produced by [`CredentialHasher::hash`].
    ///
    /// Returns `Ok(false)` on mismatch; `Err` is reserved for malformed hashes or backend
    /// failures.
    async fn verify(&self, secret: &str, hashed: &str) -> CoreResult<bool>;
}
