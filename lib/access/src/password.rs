//! Adaptive one-way hashing for passwords and device-token secrets.
//!
//! Wraps bcrypt with a fixed work factor. The same service hashes user
//! passwords and device-token secrets; bcrypt truncates its input at 72
//! bytes, so device secrets (86 URL-safe characters) are hashed over their
//! 72-byte prefix consistently on both issue and verify.

use std::fmt;

/// Work factor used in production.
pub const DEFAULT_COST: u32 = 12;

/// Error returned when producing a hash fails.
///
/// Verification never returns this: a malformed stored hash verifies as
/// false rather than erroring past the boundary.
#[derive(Debug)]
pub struct HashError {
    reason: String,
}

impl fmt::Display for HashError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "hashing failed: {}", self.reason)
    }
}

impl std::error::Error for HashError {}

/// Salted adaptive hashing service.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Creates a hasher with the production work factor.
    #[must_use]
    pub fn new() -> Self {
        Self { cost: DEFAULT_COST }
    }

    /// Creates a hasher with an explicit work factor.
    ///
    /// Tests use the bcrypt minimum cost to keep hashing fast.
    #[must_use]
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    /// Produces a salted one-way hash of `secret`.
    pub fn hash(&self, secret: &str) -> Result<String, HashError> {
        bcrypt::hash(secret, self.cost).map_err(|e| HashError {
            reason: e.to_string(),
        })
    }

    /// Returns true iff `candidate` matches the stored `hash`.
    ///
    /// A malformed stored hash returns false.
    #[must_use]
    pub fn verify(&self, hash: &str, candidate: &str) -> bool {
        bcrypt::verify(candidate, hash).unwrap_or(false)
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> PasswordHasher {
        PasswordHasher::with_cost(4)
    }

    #[test]
    fn hash_then_verify_succeeds() {
        let hasher = fast_hasher();
        let hash = hasher.hash("hunter2").expect("hash");
        assert!(hasher.verify(&hash, "hunter2"));
    }

    #[test]
    fn verify_rejects_wrong_candidate() {
        let hasher = fast_hasher();
        let hash = hasher.hash("hunter2").expect("hash");
        assert!(!hasher.verify(&hash, "hunter3"));
    }

    #[test]
    fn hash_is_salted() {
        let hasher = fast_hasher();
        let a = hasher.hash("hunter2").expect("hash");
        let b = hasher.hash("hunter2").expect("hash");
        assert_ne!(a, b);
        assert!(hasher.verify(&a, "hunter2"));
        assert!(hasher.verify(&b, "hunter2"));
    }

    #[test]
    fn hash_never_equals_plaintext() {
        let hasher = fast_hasher();
        let hash = hasher.hash("hunter2").expect("hash");
        assert_ne!(hash, "hunter2");
    }

    #[test]
    fn verify_malformed_hash_is_false() {
        let hasher = fast_hasher();
        assert!(!hasher.verify("not-a-bcrypt-hash", "hunter2"));
        assert!(!hasher.verify("", "hunter2"));
    }

    #[test]
    fn long_secrets_verify_consistently() {
        // bcrypt truncates at 72 bytes; issue and verify must agree.
        let hasher = fast_hasher();
        let secret = "x".repeat(86);
        let hash = hasher.hash(&secret).expect("hash");
        assert!(hasher.verify(&hash, &secret));
    }
}
