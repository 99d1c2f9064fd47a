//! Deterministic content hashing for emitted file names.
//!
//! The hashing strategy is fixed rather than pluggable: one deterministic
//! function over the concatenation of declarations, client body, and
//! child-init specifications. Uses `xxhash-rust`'s `xxh3`, already a
//! workspace dependency, for a fast, seedless, dependency-aligned hash.

use xxhash_rust::xxh3::xxh3_64;

/// Hex-encoded, 10-character content hash of `content`.
///
/// Used for combined-file names (`<basename>-<hash>.js`) and per-component
/// emission paths (`<ComponentName>-<hash>.js`). Callers are responsible for
/// concatenating exactly the intended inputs (declarations + client body +
/// child-init specifications) before hashing.
pub fn content_hash(content: &str) -> String {
    let digest = xxh3_64(content.as_bytes());
    format!("{digest:016x}")[..10].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_content_same_hash() {
        assert_eq!(content_hash("const x = 1;"), content_hash("const x = 1;"));
    }

    #[test]
    fn different_content_different_hash() {
        assert_ne!(content_hash("const x = 1;"), content_hash("const x = 2;"));
    }

    #[test]
    fn hash_is_ten_hex_chars() {
        let h = content_hash("anything");
        assert_eq!(h.len(), 10);
        assert!(h.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
