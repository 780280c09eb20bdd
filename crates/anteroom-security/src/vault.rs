// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Encrypted vault — AES-256-GCM over durable key-value storage.
//
// Key derivation: SHA-256(passphrase ‖ salt), used directly as the AES-256
// key.  Blob layout: base64(nonce ‖ ciphertext ‖ tag) with a fresh random
// 12-byte nonce per encryption, never reused under the same key.
//
// The inner `Vault` keeps a full error taxonomy (malformed blob, failed
// authentication, JSON errors) for diagnosability.  The outer
// `EncryptedStore` is the application-facing boundary: every read failure
// collapses to `None` and a failed encryption skips the write, so callers
// see "no data" or "nothing happened" rather than an error.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use ring::aead::{self, Aad, LessSafeKey, Nonce, UnboundKey};
use ring::rand::{SecureRandom, SystemRandom};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};

use anteroom_core::error::{AnteroomError, Result};

use crate::hashing::sha256_raw;
use crate::keyvalue::SharedStore;

/// AES-GCM authentication tag length in bytes.
const TAG_LEN: usize = 16;

/// Derive the AES-256 key material: `SHA-256(passphrase ‖ salt)`.
///
/// Deterministic: identical inputs always produce the same key, so blobs
/// written in one run decrypt in the next.
pub fn derive_key(passphrase: &str, salt: &str) -> [u8; 32] {
    let mut material = Vec::with_capacity(passphrase.len() + salt.len());
    material.extend_from_slice(passphrase.as_bytes());
    material.extend_from_slice(salt.as_bytes());
    sha256_raw(&material)
}

/// Sealer/opener for vault blobs.
///
/// The key is derived from a passphrase baked into the application
/// configuration.  This protects stored data against casual inspection of
/// the raw storage file only; it is not a defense against anyone who can
/// read the binary or its configuration.
pub struct Vault {
    key_bytes: [u8; 32],
    rng: SystemRandom,
}

impl Vault {
    /// Create a vault keyed by `SHA-256(passphrase ‖ salt)`.
    pub fn new(passphrase: &str, salt: &str) -> Self {
        Self {
            key_bytes: derive_key(passphrase, salt),
            rng: SystemRandom::new(),
        }
    }

    fn sealing_key(&self) -> Result<LessSafeKey> {
        let unbound = UnboundKey::new(&aead::AES_256_GCM, &self.key_bytes)
            .map_err(|_| AnteroomError::Encryption("key setup failed".into()))?;
        Ok(LessSafeKey::new(unbound))
    }

    /// Encrypt `plaintext` and return the blob as a base64 string.
    ///
    /// A fresh 12-byte nonce is drawn from the OS CSPRNG for every call and
    /// prefixed to the ciphertext before encoding.
    #[instrument(skip_all, fields(plaintext_len = plaintext.len()))]
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<String> {
        let mut nonce_bytes = [0u8; aead::NONCE_LEN];
        self.rng
            .fill(&mut nonce_bytes)
            .map_err(|_| AnteroomError::Encryption("nonce generation failed".into()))?;
        let nonce = Nonce::assume_unique_for_key(nonce_bytes);

        let mut buffer = plaintext.to_vec();
        self.sealing_key()?
            .seal_in_place_append_tag(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| AnteroomError::Encryption("seal failed".into()))?;

        let mut framed = Vec::with_capacity(aead::NONCE_LEN + buffer.len());
        framed.extend_from_slice(&nonce_bytes);
        framed.extend_from_slice(&buffer);

        let blob = BASE64.encode(&framed);
        debug!(blob_len = blob.len(), "encryption complete");
        Ok(blob)
    }

    /// Decrypt a blob produced by [`encrypt`](Self::encrypt) and return the
    /// original plaintext bytes.
    ///
    /// A wrong key and a tampered blob are indistinguishable: AES-GCM
    /// reports both as an authentication failure.
    #[instrument(skip_all, fields(blob_len = blob.len()))]
    pub fn decrypt(&self, blob: &str) -> Result<Vec<u8>> {
        let framed = BASE64
            .decode(blob)
            .map_err(|e| AnteroomError::MalformedBlob(format!("base64: {e}")))?;

        if framed.len() < aead::NONCE_LEN + TAG_LEN {
            return Err(AnteroomError::MalformedBlob(format!(
                "blob too short: {} bytes",
                framed.len()
            )));
        }

        let (nonce_bytes, ciphertext) = framed.split_at(aead::NONCE_LEN);
        let nonce = Nonce::try_assume_unique_for_key(nonce_bytes)
            .map_err(|_| AnteroomError::MalformedBlob("bad nonce".into()))?;

        let mut buffer = ciphertext.to_vec();
        let plaintext = self
            .sealing_key()
            .map_err(|_| AnteroomError::Decryption("key setup failed".into()))?
            .open_in_place(nonce, Aad::empty(), &mut buffer)
            .map_err(|_| AnteroomError::Decryption("authentication failed".into()))?
            .to_vec();

        debug!(plaintext_len = plaintext.len(), "decryption complete");
        Ok(plaintext)
    }
}

/// Application-facing encrypted store: JSON values sealed with the vault
/// key and kept in durable key-value storage.
///
/// Read failures of any kind (missing entry, damaged blob, wrong key,
/// unparseable JSON) collapse to `None` here, logged before collapsing.
/// An encryption failure on the write side skips the write and leaves any
/// previously stored value untouched.  Only backend storage errors
/// propagate.
pub struct EncryptedStore {
    vault: Vault,
    backend: SharedStore,
}

impl EncryptedStore {
    pub fn new(backend: SharedStore, passphrase: &str, salt: &str) -> Self {
        Self {
            vault: Vault::new(passphrase, salt),
            backend,
        }
    }

    /// Serialize `value` to JSON, encrypt it, and persist it under `key`.
    ///
    /// If serialization or encryption fails the write is skipped, the
    /// previous value is left untouched, and the cause is logged.
    #[instrument(skip_all, fields(%key))]
    pub fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let json = match serde_json::to_string(value) {
            Ok(json) => json,
            Err(e) => {
                warn!(%key, error = %e, "serialization failed, write skipped");
                return Ok(());
            }
        };

        let blob = match self.vault.encrypt(json.as_bytes()) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(%key, error = %e, "encryption failed, write skipped");
                return Ok(());
            }
        };

        self.backend.put(key, &blob)
    }

    /// Read, decrypt, and parse the value stored under `key`.
    ///
    /// Any failure at any stage yields `None`, never a panic or a
    /// propagated error.
    #[instrument(skip_all, fields(%key))]
    pub fn retrieve<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let blob = match self.backend.get(key) {
            Ok(Some(blob)) => blob,
            Ok(None) => {
                debug!(%key, "no stored value");
                return None;
            }
            Err(e) => {
                warn!(%key, error = %e, "storage read failed");
                return None;
            }
        };

        let plaintext = match self.vault.decrypt(&blob) {
            Ok(plaintext) => plaintext,
            Err(e) => {
                warn!(%key, error = %e, "stored blob could not be decrypted");
                return None;
            }
        };

        match serde_json::from_slice(&plaintext) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(%key, error = %e, "decrypted payload is not valid JSON");
                None
            }
        }
    }

    /// Delete the entry stored under `key`.
    ///
    /// Removing an absent key is not an error.
    pub fn remove(&self, key: &str) -> Result<()> {
        self.backend.remove(key)
    }
}
