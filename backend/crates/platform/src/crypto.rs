//! Cryptographic Utilities

use std::fmt;

use base64::{Engine, engine::general_purpose};
use rand::{RngCore, rngs::OsRng};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Minimum signing key length in bytes (HS256 block strength)
pub const MIN_SIGNING_KEY_LEN: usize = 32;

/// Generate cryptographically secure random bytes
pub fn random_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0u8; len];
    OsRng.fill_bytes(&mut bytes);
    bytes
}

/// Encode bytes as unpadded base64url
pub fn to_base64url(bytes: &[u8]) -> String {
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

// ============================================================================
// Signing key
// ============================================================================

/// Error when loading a signing key
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SigningKeyError {
    #[error("signing key is not valid base64")]
    InvalidEncoding,

    #[error("signing key must be at least {min} bytes (got {actual})")]
    TooShort { min: usize, actual: usize },
}

/// Secret key for token signatures
///
/// Zeroized on drop; `Debug` never prints the material.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SigningKey(Vec<u8>);

impl SigningKey {
    pub fn new(bytes: Vec<u8>) -> Result<Self, SigningKeyError> {
        if bytes.len() < MIN_SIGNING_KEY_LEN {
            return Err(SigningKeyError::TooShort {
                min: MIN_SIGNING_KEY_LEN,
                actual: bytes.len(),
            });
        }
        Ok(Self(bytes))
    }

    /// Decode a key from standard or url-safe base64
    pub fn from_base64(encoded: &str) -> Result<Self, SigningKeyError> {
        let encoded = encoded.trim();
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .or_else(|_| general_purpose::URL_SAFE_NO_PAD.decode(encoded))
            .map_err(|_| SigningKeyError::InvalidEncoding)?;
        Self::new(bytes)
    }

    /// Fresh random key (tests and throwaway local runs)
    pub fn random() -> Self {
        Self(random_bytes(MIN_SIGNING_KEY_LEN))
    }

    /// Raw key material, for handing to the signer
    pub fn expose_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for SigningKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SigningKey").field(&"[REDACTED]").finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64url_has_no_padding() {
        let encoded = to_base64url(b"ab");
        assert!(!encoded.contains('='));
        assert_eq!(encoded, "YWI");
    }

    #[test]
    fn test_random_bytes_are_fresh() {
        let a = random_bytes(16);
        assert_eq!(a.len(), 16);
        assert_ne!(a, random_bytes(16));
    }

    #[test]
    fn test_signing_key_length() {
        let short = SigningKey::new(vec![1u8; 16]);
        assert_eq!(
            short.unwrap_err(),
            SigningKeyError::TooShort { min: 32, actual: 16 }
        );
        assert!(SigningKey::from_base64("not base64 at all!").is_err());
        let encoded = general_purpose::STANDARD.encode([7u8; 48]);
        let key = SigningKey::from_base64(&encoded).unwrap();
        assert_eq!(key.expose_bytes(), &[7u8; 48]);
    }

    #[test]
    fn test_signing_key_debug_redacted() {
        let key = SigningKey::new(vec![0xAB; 32]).unwrap();
        let debug = format!("{key:?}");
        assert!(debug.contains("REDACTED"));
        assert!(!debug.contains("171"));
    }
}
