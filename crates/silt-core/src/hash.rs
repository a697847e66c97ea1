//! Content hashing using SHA-1.
//!
//! Every stored object — blob or commit record — is identified by the
//! SHA-1 of its bytes, so the on-disk object names are stable across
//! machines and runs.

use sha1::{Digest, Sha1};

/// Compute the SHA-1 hash of arbitrary bytes, returned as a hex string.
pub fn hash_bytes(data: &[u8]) -> String {
    let mut hasher = Sha1::new();
    hasher.update(data);
    let digest = hasher.finalize();
    hex_encode(&digest)
}

/// Compute the SHA-1 hash of a string.
pub fn hash_str(s: &str) -> String {
    hash_bytes(s.as_bytes())
}

/// Encode raw bytes as a lowercase hex string.
fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        let h1 = hash_str("hello world");
        let h2 = hash_str("hello world");
        assert_eq!(h1, h2);
    }

    #[test]
    fn test_hash_different_inputs() {
        let h1 = hash_str("hello");
        let h2 = hash_str("world");
        assert_ne!(h1, h2);
    }

    #[test]
    fn test_hash_length() {
        let h = hash_str("test");
        // SHA-1 produces 40 hex characters
        assert_eq!(h.len(), 40);
    }

    #[test]
    fn test_known_digest() {
        // Pinned value: object names on disk depend on it.
        assert_eq!(
            hash_str("hello\n"),
            "f572d396fae9206628714fb2ce00f72e94f2258f"
        );
    }
}
