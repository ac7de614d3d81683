// crates/schematic-core/src/crypto.rs

use sha2::{Digest, Sha256};

/// Compute SHA-256 hash of the given bytes.
///
/// Returns a 32-byte hash.
pub fn hash_bytes(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// SHA-256 of the given bytes as a lowercase hex string (64 characters).
pub fn hash_hex(data: &[u8]) -> String {
    hex::encode(hash_bytes(data))
}

/// 32-bit digest of a string: the first 4 bytes of its SHA-256, little-endian.
///
/// Stable across platforms and runs, unlike the standard library's
/// randomly keyed hashers.
pub fn hash_prefix_u32(text: &str) -> u32 {
    let hash = hash_bytes(text.as_bytes());
    u32::from_le_bytes([hash[0], hash[1], hash[2], hash[3]])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_bytes() {
        let data = b"schematic";
        let hash = hash_bytes(data);
        assert_eq!(hash.len(), 32);

        // Same input should produce same hash
        let hash2 = hash_bytes(data);
        assert_eq!(hash, hash2);

        // Different input should produce different hash
        let hash3 = hash_bytes(b"different");
        assert_ne!(hash, hash3);
    }

    #[test]
    fn test_hash_hex_known_vector() {
        assert_eq!(
            hash_hex(b""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
        let hex = hash_hex(b"abc");
        assert_eq!(hex.len(), 64);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn test_hash_prefix_matches_digest_bytes() {
        // SHA-256("") starts with e3 b0 c4 42.
        assert_eq!(hash_prefix_u32(""), u32::from_le_bytes([0xe3, 0xb0, 0xc4, 0x42]));
        assert_eq!(hash_prefix_u32("Steel"), hash_prefix_u32("Steel"));
        assert_ne!(hash_prefix_u32("Steel"), hash_prefix_u32("Glass"));
    }
}
