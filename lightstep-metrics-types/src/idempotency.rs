use std::fmt;

use rand::Rng;

/// Random token attached to every envelope so the receiver can drop
/// duplicates.
///
/// Keys consist of [`IdempotencyKey::LEN`] lowercase ASCII letters.  A new
/// key is generated for every envelope, including envelopes that cover a
/// window widened by earlier failed sends.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    /// Number of characters in a generated key.
    pub const LEN: usize = 32;

    /// Generates a fresh random key.
    pub fn generate() -> Self {
        let mut rng = rand::rng();
        let key = (0..Self::LEN)
            .map(|_| char::from(rng.random_range(b'a'..=b'z')))
            .collect();
        IdempotencyKey(key)
    }

    /// Returns the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IdempotencyKey> for String {
    fn from(key: IdempotencyKey) -> Self {
        key.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_shape() {
        let key = IdempotencyKey::generate();
        assert_eq!(key.as_str().len(), IdempotencyKey::LEN);
        assert!(key.as_str().bytes().all(|b| b.is_ascii_lowercase()));
    }

    #[test]
    fn test_successive_keys_differ() {
        assert_ne!(IdempotencyKey::generate(), IdempotencyKey::generate());
    }
}
