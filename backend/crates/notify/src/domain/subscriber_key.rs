//! Subscriber Key
//!
//! Identifies the party a notification channel belongs to. Keys are 1-128
//! characters from `[A-Za-z0-9_.@:-]`.

use std::fmt;

use thiserror::Error;

pub const MAX_SUBSCRIBER_KEY_LENGTH: usize = 128;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidSubscriberKey {
    #[error("subscriber key cannot be empty")]
    Empty,

    #[error("subscriber key must be at most {max} characters")]
    TooLong { max: usize },

    #[error("subscriber key contains an invalid character")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriberKey(String);

impl SubscriberKey {
    pub fn parse(raw: &str) -> Result<Self, InvalidSubscriberKey> {
        if raw.is_empty() {
            return Err(InvalidSubscriberKey::Empty);
        }
        if raw.len() > MAX_SUBSCRIBER_KEY_LENGTH {
            return Err(InvalidSubscriberKey::TooLong {
                max: MAX_SUBSCRIBER_KEY_LENGTH,
            });
        }
        if !raw.bytes().all(is_key_byte) {
            return Err(InvalidSubscriberKey::InvalidCharacter);
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[inline]
fn is_key_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'_' | b'.' | b'@' | b':' | b'-')
}

impl fmt::Display for SubscriberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        for raw in ["42", "user@example.com", "tenant:7_a-b.c"] {
            assert_eq!(SubscriberKey::parse(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_invalid_keys() {
        assert_eq!(SubscriberKey::parse(""), Err(InvalidSubscriberKey::Empty));
        assert_eq!(
            SubscriberKey::parse(&"k".repeat(MAX_SUBSCRIBER_KEY_LENGTH + 1)),
            Err(InvalidSubscriberKey::TooLong {
                max: MAX_SUBSCRIBER_KEY_LENGTH
            })
        );
        for raw in ["a b", "a/b", "ключ", "a\nb"] {
            assert_eq!(
                SubscriberKey::parse(raw),
                Err(InvalidSubscriberKey::InvalidCharacter),
                "{raw:?}"
            );
        }
    }
}
