// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Anteroom.
//
// Policy outcomes (lockout active, wrong credentials, password too short) are
// NOT errors — they are reported through `AuthOutcome`.  The variants here
// cover genuine failures: cryptography, storage, and bad registry input.

use thiserror::Error;

/// Top-level error type for all Anteroom operations.
#[derive(Debug, Error)]
pub enum AnteroomError {
    // -- Authentication --
    #[error("session token generation failed: {0}")]
    TokenGeneration(String),

    // -- Crypto --
    #[error("encryption failed: {0}")]
    Encryption(String),

    #[error("decryption failed: {0}")]
    Decryption(String),

    #[error("malformed ciphertext blob: {0}")]
    MalformedBlob(String),

    // -- Registry --
    #[error("signup request not found: {0}")]
    RequestNotFound(String),

    #[error("invalid {field}: {reason}")]
    InvalidField {
        field: &'static str,
        reason: String,
    },

    // -- Storage / persistence --
    #[error("database error: {0}")]
    Database(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, AnteroomError>;
