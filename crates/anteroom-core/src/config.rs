// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.
//
// Every threshold and credential is a configuration value with a compiled-in
// default matching the original deployment, never a bare constant in the code
// that uses it.

use serde::{Deserialize, Serialize};

/// Login and session policy thresholds.
///
/// Lockout and expiry decisions are made against the local wall clock with no
/// external corroboration, so anyone with direct access to the durable store
/// can defeat the lockout by deleting its record.  That is an accepted
/// limitation of the no-backend design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Failed attempts tolerated before the lockout engages.
    pub max_login_attempts: u32,
    /// How long a lockout lasts once engaged.
    pub lockout_minutes: i64,
    /// Absolute session lifetime from creation, regardless of activity.
    pub session_minutes: i64,
    /// Idle time after which a session is invalidated.
    pub inactivity_timeout_minutes: i64,
    /// Minimum accepted password length (checked before hashing).
    pub min_password_length: usize,
    /// Length of generated session tokens, in characters.
    pub token_length: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_login_attempts: 3,
            lockout_minutes: 10,
            session_minutes: 15,
            inactivity_timeout_minutes: 5,
            min_password_length: 8,
            token_length: 32,
        }
    }
}

/// SHA-256 hex digests of the admin login credentials.
///
/// A deployment can override these via `config.json` or environment variables
/// without recompiling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminCredentials {
    pub username_hash: String,
    pub password_hash: String,
}

impl Default for AdminCredentials {
    fn default() -> Self {
        // Digests of "admin" / "Click1Secure@2024".
        Self {
            username_hash: "8c6976e5b5410415bde908bd4dee15dfb167a9c873fc4bb8a81f6f2ab448a918"
                .into(),
            password_hash: "9bae9f9a0120f788b1838162c1413762115340596aff8e626ee1c9f5d5f3b469"
                .into(),
        }
    }
}

/// Key material for the encrypted store.
///
/// The default passphrase is baked into the application.  This protects
/// stored data from casual inspection of the raw store only; anyone who can
/// read the binary or the config file can derive the key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VaultConfig {
    pub passphrase: String,
    pub salt: String,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            passphrase: "Click1SecureKey2024".into(),
            salt: "Click1Salt".into(),
        }
    }
}

/// Company contact details shared with approved vendors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyContact {
    pub phone: String,
    pub email: String,
    pub address: String,
}

impl Default for CompanyContact {
    fn default() -> Self {
        Self {
            phone: "+91-98765-43210".into(),
            email: "contact@click1solutions.in".into(),
            address: "Hamirpur District, Himachal Pradesh, India".into(),
        }
    }
}

/// Persistent application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub security: SecurityConfig,
    pub admin: AdminCredentials,
    pub vault: VaultConfig,
    pub contact: CompanyContact,
}
