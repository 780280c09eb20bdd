// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Credential gate — the state machine in front of the admin surface.
//
// Login outcomes, in evaluation order:
//   1. lockout active            -> refused, counters untouched
//   2. password below min length -> refused, no attempt consumed
//   3. digests match             -> counter reset, fresh session issued
//   4. mismatch                  -> counter bumped; reaching the maximum
//                                   writes the lockout marker
//
// Policy rejections are ordinary `AuthOutcome` values, not errors.  Only
// storage failures surface as `Err`.

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use anteroom_core::config::{AdminCredentials, SecurityConfig};
use anteroom_core::error::Result;

use crate::hashing::{constant_time_eq, sha256_hex};
use crate::keyvalue::SharedStore;
use crate::lockout::{AttemptTracker, LockoutStatus};
use crate::session::{Session, SessionStore};

/// Outcome of an authentication attempt.
#[derive(Debug, Clone)]
pub struct AuthOutcome {
    pub success: bool,
    /// Human-readable reason, shown to the admin verbatim.
    pub message: String,
    /// Session token, present on success only.
    pub token: Option<String>,
    /// True when a lockout refused the attempt or this attempt triggered
    /// one.
    pub locked: bool,
}

/// Credential lookup capability.
///
/// The gate never sees plaintext reference credentials, only stored
/// digests.  Keeping the lookup behind a trait leaves the gate logic
/// independent of how many admins exist.
pub trait CredentialDirectory: Send + Sync {
    /// Return the stored digests for `username`, or `None` if unknown.
    fn lookup(&self, username: &str) -> Option<AdminCredentials>;
}

/// Directory with exactly one admin.
///
/// Hands back its record for any username: the gate's digest comparison
/// rejects wrong names anyway, and answering every lookup keeps the lookup
/// itself from leaking which names exist.
pub struct SingleAdmin {
    credentials: AdminCredentials,
}

impl SingleAdmin {
    pub fn new(credentials: AdminCredentials) -> Self {
        Self { credentials }
    }
}

impl CredentialDirectory for SingleAdmin {
    fn lookup(&self, _username: &str) -> Option<AdminCredentials> {
        Some(self.credentials.clone())
    }
}

/// The credential gate: authentication, session checks, lockout queries.
///
/// Attempt and lockout state live in the durable store so they survive
/// restarts; the session record lives in the ephemeral store so it does
/// not.
pub struct CredentialGate {
    directory: Box<dyn CredentialDirectory>,
    sessions: SessionStore,
    attempts: AttemptTracker,
    config: SecurityConfig,
}

impl CredentialGate {
    pub fn new(
        config: SecurityConfig,
        directory: Box<dyn CredentialDirectory>,
        durable: SharedStore,
        ephemeral: SharedStore,
    ) -> Self {
        Self {
            sessions: SessionStore::new(ephemeral, config.clone()),
            attempts: AttemptTracker::new(durable, config.clone()),
            directory,
            config,
        }
    }

    /// Verify credentials and, on success, issue a session.
    ///
    /// Every failure mode is an `Ok(AuthOutcome)` with `success: false`;
    /// `Err` means the backing store failed.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthOutcome> {
        self.authenticate_at(username, password, Utc::now())
    }

    #[instrument(skip_all)]
    pub fn authenticate_at(
        &self,
        username: &str,
        password: &str,
        now: DateTime<Utc>,
    ) -> Result<AuthOutcome> {
        let status = self.attempts.status_at(now)?;
        if status.locked {
            debug!("login refused, lockout active");
            return Ok(AuthOutcome {
                success: false,
                message: format!(
                    "Account locked. Try again in {} minutes.",
                    status.remaining_minutes
                ),
                token: None,
                locked: true,
            });
        }

        if password.chars().count() < self.config.min_password_length {
            return Ok(AuthOutcome {
                success: false,
                message: format!(
                    "Password must be at least {} characters.",
                    self.config.min_password_length
                ),
                token: None,
                locked: false,
            });
        }

        // Hash both inputs before any comparison, so a wrong username costs
        // the same work as a wrong password.
        let username_hash = sha256_hex(username.as_bytes());
        let password_hash = sha256_hex(password.as_bytes());

        let (username_ok, password_ok) = match self.directory.lookup(username) {
            Some(stored) => (
                constant_time_eq(&username_hash, &stored.username_hash),
                constant_time_eq(&password_hash, &stored.password_hash),
            ),
            None => (false, false),
        };

        if username_ok && password_ok {
            self.attempts.reset()?;
            let session = self.sessions.create_at(now)?;
            info!("admin authenticated");
            return Ok(AuthOutcome {
                success: true,
                message: "Login successful".into(),
                token: Some(session.token),
                locked: false,
            });
        }

        let count = self.attempts.record_failure_at(now)?;
        if count >= self.config.max_login_attempts {
            warn!("login locked after repeated failures");
            return Ok(AuthOutcome {
                success: false,
                message: "Account locked due to too many failed attempts.".into(),
                token: None,
                locked: true,
            });
        }

        let remaining = self.config.max_login_attempts - count;
        debug!(remaining, "login failed");
        Ok(AuthOutcome {
            success: false,
            message: format!("Invalid credentials. {remaining} attempts remaining."),
            token: None,
            locked: false,
        })
    }

    /// True iff a session exists and is inside both its absolute and
    /// inactivity windows.  A session that fails either check is cleared
    /// as a side effect.
    pub fn is_session_valid(&self) -> bool {
        self.sessions.is_valid()
    }

    pub fn is_session_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.sessions.is_valid_at(now)
    }

    /// The current session, if one is valid.
    pub fn current_session(&self) -> Option<Session> {
        self.sessions.valid_session()
    }

    pub fn current_session_at(&self, now: DateTime<Utc>) -> Option<Session> {
        self.sessions.valid_session_at(now)
    }

    /// Record admin activity, sliding the inactivity window.
    ///
    /// Fires on every tracked interaction, so it swallows storage errors
    /// after logging them rather than interrupting the caller.
    pub fn update_activity(&self) {
        self.update_activity_at(Utc::now());
    }

    pub fn update_activity_at(&self, now: DateTime<Utc>) {
        if let Err(e) = self.sessions.touch_at(now) {
            warn!(error = %e, "activity update failed");
        }
    }

    /// Delete the session record unconditionally (logout).
    pub fn clear_session(&self) {
        if let Err(e) = self.sessions.clear() {
            warn!(error = %e, "session clear failed");
        }
    }

    /// True iff a currently-valid session exists and its token matches.
    pub fn verify_session_token(&self, token: &str) -> bool {
        self.sessions.verify_token(token)
    }

    pub fn verify_session_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        self.sessions.verify_token_at(token, now)
    }

    /// Lockout state, lazily clearing an expired marker.
    pub fn is_login_locked(&self) -> Result<LockoutStatus> {
        self.attempts.status()
    }

    pub fn is_login_locked_at(&self, now: DateTime<Utc>) -> Result<LockoutStatus> {
        self.attempts.status_at(now)
    }
}
