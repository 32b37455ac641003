//! Secret Hashing and Verification
//!
//! Principal secrets are handled with:
//! - Argon2id hashing (memory-hard, recommended by OWASP)
//! - Zeroization of clear text on drop
//! - NFKC normalization so visually identical input verifies identically
//!
//! ## Security Features
//! - Memory-hard hashing prevents GPU/ASIC attacks
//! - Length cap bounds the hashing work a single request can cause
//! - [`HashedSecret::burn`] lets callers spend equal time on unknown identifiers

use std::fmt;
use std::sync::OnceLock;

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Maximum secret length in code points
pub const MAX_SECRET_LENGTH: usize = 128;

// ============================================================================
// Error Types
// ============================================================================

/// Secret input errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretInputError {
    #[error("Secret cannot be empty")]
    Empty,

    #[error("Secret must be at most {max} characters (got {actual})")]
    TooLong { max: usize, actual: usize },
}

/// Hashing/verification errors
#[derive(Debug, Error)]
pub enum SecretHashError {
    #[error("Secret hashing failed: {0}")]
    HashingFailed(String),

    #[error("Invalid secret hash format")]
    InvalidHashFormat,
}

// ============================================================================
// Clear Text Secret (Zeroized on drop)
// ============================================================================

/// Clear text secret with automatic memory zeroization
///
/// Does not implement `Clone`; `Debug` output is redacted.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ClearTextSecret(String);

impl ClearTextSecret {
    pub fn new(mut raw: String) -> Result<Self, SecretInputError> {
        let normalized: String = raw.nfkc().collect();
        raw.zeroize();

        if normalized.is_empty() {
            return Err(SecretInputError::Empty);
        }

        let char_count = normalized.chars().count();
        if char_count > MAX_SECRET_LENGTH {
            return Err(SecretInputError::TooLong {
                max: MAX_SECRET_LENGTH,
                actual: char_count,
            });
        }

        Ok(Self(normalized))
    }

    fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    /// Hash the secret using Argon2id (OWASP default parameters)
    pub fn hash(&self) -> Result<HashedSecret, SecretHashError> {
        let salt = SaltString::generate(OsRng);

        let hash = Argon2::default()
            .hash_password(self.as_bytes(), &salt)
            .map_err(|e| SecretHashError::HashingFailed(e.to_string()))?;

        Ok(HashedSecret {
            hash: hash.to_string(),
        })
    }
}

impl fmt::Debug for ClearTextSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ClearTextSecret")
            .field(&"[REDACTED]")
            .finish()
    }
}

// ============================================================================
// Hashed Secret (Safe to store)
// ============================================================================

/// Hashed secret in PHC string format
#[derive(Clone, PartialEq, Eq)]
pub struct HashedSecret {
    hash: String,
}

impl HashedSecret {
    /// Create from PHC string (e.g., from database)
    pub fn from_phc_string(s: impl Into<String>) -> Result<Self, SecretHashError> {
        let hash = s.into();
        PasswordHash::new(&hash).map_err(|_| SecretHashError::InvalidHashFormat)?;
        Ok(Self { hash })
    }

    pub fn as_phc_string(&self) -> &str {
        &self.hash
    }

    /// Verify a secret against this hash (constant time inside argon2)
    pub fn verify(&self, secret: &ClearTextSecret) -> bool {
        let Ok(parsed_hash) = PasswordHash::new(&self.hash) else {
            return false;
        };

        Argon2::default()
            .verify_password(secret.as_bytes(), &parsed_hash)
            .is_ok()
    }

    /// Run one verification against a fixed throwaway hash.
    ///
    /// Called when the identifier is unknown so that path costs the same as
    /// a wrong secret. Always returns `false`.
    pub fn burn(secret: &ClearTextSecret) -> bool {
        static DUMMY: OnceLock<Option<HashedSecret>> = OnceLock::new();

        let dummy = DUMMY.get_or_init(|| {
            ClearTextSecret::new("dummy-secret-for-timing".to_string())
                .ok()
                .and_then(|s| s.hash().ok())
        });

        if let Some(dummy) = dummy {
            let _ = dummy.verify(secret);
        }
        false
    }
}

impl fmt::Debug for HashedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HashedSecret")
            .field("hash", &"[HASH]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> ClearTextSecret {
        ClearTextSecret::new(s.to_string()).unwrap()
    }

    #[test]
    fn test_empty_secret() {
        assert_eq!(
            ClearTextSecret::new(String::new()).unwrap_err(),
            SecretInputError::Empty
        );
    }

    #[test]
    fn test_secret_too_long() {
        let result = ClearTextSecret::new("a".repeat(MAX_SECRET_LENGTH + 1));
        assert!(matches!(result, Err(SecretInputError::TooLong { .. })));
    }

    #[test]
    fn test_hash_and_verify() {
        let hashed = secret("correct horse battery").hash().unwrap();
        assert!(hashed.verify(&secret("correct horse battery")));
        assert!(!hashed.verify(&secret("correct horse battery!")));
    }

    #[test]
    fn test_nfkc_normalization() {
        // Fullwidth letters normalize to ASCII
        let hashed = secret("ｓｅｃｒｅｔ").hash().unwrap();
        assert!(hashed.verify(&secret("secret")));
    }

    #[test]
    fn test_phc_string_roundtrip() {
        let hashed = secret("TestSecret123!").hash().unwrap();
        let restored = HashedSecret::from_phc_string(hashed.as_phc_string()).unwrap();
        assert!(restored.verify(&secret("TestSecret123!")));
    }

    #[test]
    fn test_invalid_phc_string() {
        assert!(HashedSecret::from_phc_string("not_a_valid_hash").is_err());
    }

    #[test]
    fn test_burn_never_matches() {
        assert!(!HashedSecret::burn(&secret("dummy-secret-for-timing")));
    }

    #[test]
    fn test_debug_redaction() {
        let debug_output = format!("{:?}", secret("hunter22"));
        assert!(debug_output.contains("REDACTED"));
        assert!(!debug_output.contains("hunter22"));
    }
}
