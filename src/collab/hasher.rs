use sha2::{Digest, Sha256};

use crate::collab::ContentHasher;

/// Hex SHA-256 digest truncated to `len` characters.
#[derive(Debug, Clone, Copy)]
pub struct Sha256Hasher {
    len: usize,
}

impl Sha256Hasher {
    pub fn new(len: usize) -> Self {
        Self { len }
    }
}

impl Default for Sha256Hasher {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ContentHasher for Sha256Hasher {
    fn hash(&self, contents: &[u8]) -> String {
        let digest = hex::encode(Sha256::digest(contents));
        digest[..self.len.min(digest.len())].to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_truncated_hex() {
        let hash = Sha256Hasher::default().hash(b"body { color: red }");
        assert_eq!(hash.len(), 10);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn known_digest() {
        assert_eq!(Sha256Hasher::new(8).hash(b""), "e3b0c442");
    }

    #[test]
    fn different_content_different_hash() {
        let hasher = Sha256Hasher::default();
        assert_ne!(hasher.hash(b"a"), hasher.hash(b"b"));
    }
}
