// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// SHA-256 hashing — credential digests and vault key derivation.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Compute the SHA-256 hash of `data` and return it as a lowercase hex string.
///
/// Used to digest the admin username and password for comparison against
/// the stored reference hashes.
pub fn sha256_hex(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    hex::encode(result)
}

/// Compute the SHA-256 hash of `data` as raw bytes.
///
/// The vault uses the digest of `passphrase ‖ salt` directly as AES-256-GCM
/// key material, so the raw 32 bytes are needed rather than hex.
pub fn sha256_raw(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Compare two strings in constant time.
///
/// Used for credential digests and session tokens, where the timing of a
/// mismatch should not reveal how many leading characters matched.  A
/// length difference returns early; the compared values are fixed-length
/// digests, so the length itself is not secret.
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    bool::from(a.as_bytes().ct_eq(b.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// SHA-256 of the empty byte slice (well-known constant).
    const EMPTY_SHA256: &str =
        "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

    #[test]
    fn hash_empty_input() {
        assert_eq!(sha256_hex(b""), EMPTY_SHA256);
    }

    #[test]
    fn hash_known_value() {
        // SHA-256("hello") — verified against coreutils sha256sum.
        let expected = "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824";
        assert_eq!(sha256_hex(b"hello"), expected);
    }

    #[test]
    fn hash_admin_username() {
        // The compiled-in default digest for the admin username.
        let expected = "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918";
        assert_eq!(sha256_hex(b"admin"), expected);
    }

    #[test]
    fn raw_and_hex_agree() {
        let raw = sha256_raw(b"anteroom");
        assert_eq!(hex::encode(raw), sha256_hex(b"anteroom"));
    }

    #[test]
    fn constant_time_eq_accepts_equal_strings() {
        let digest = sha256_hex(b"abc");
        assert!(constant_time_eq(&digest, &digest.clone()));
    }

    #[test]
    fn constant_time_eq_rejects_difference() {
        assert!(!constant_time_eq(&sha256_hex(b"abc"), &sha256_hex(b"abd")));
    }

    #[test]
    fn constant_time_eq_rejects_trailing_difference() {
        // Equal length, differing only in the final character.
        let digest = sha256_hex(b"abc");
        let mut flipped = digest.clone().into_bytes();
        flipped[63] ^= 0x01;
        let flipped = String::from_utf8(flipped).expect("ascii digest");
        assert!(!constant_time_eq(&digest, &flipped));
    }

    #[test]
    fn constant_time_eq_rejects_length_mismatch() {
        assert!(!constant_time_eq("abcd", "abcde"));
    }
}
