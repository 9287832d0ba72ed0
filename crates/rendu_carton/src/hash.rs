//! Fast hashing utilities using xxHash3.
//!
//! Provides content fingerprints so a project can skip re-lowering a module
//! whose source did not change.

use xxhash_rust::xxh3::xxh3_64;

/// Compute a 64-bit hash of the given string using xxHash3.
#[inline]
pub fn hash_str(data: &str) -> u64 {
    xxh3_64(data.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        let source = "export function Header() { return <h1 /> }";
        assert_eq!(hash_str(source), hash_str(source));
        assert_ne!(hash_str(source), hash_str("export function Footer() {}"));
    }
}
