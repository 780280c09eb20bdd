// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Admin sessions — time-boxed, activity-tracked, stored ephemerally.
//
// A session carries two independent clocks: an absolute expiry set at
// creation and a sliding inactivity window refreshed by `touch`.  Either
// one lapsing invalidates the session.  The record lives in the ephemeral
// key-value store under a fixed key, so closing the app ends the session.
//
// Every public operation has an `_at(now)` variant taking an explicit
// timestamp; the plain variants use the wall clock.  Tests use `_at`.

use chrono::{DateTime, Duration, Utc};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use anteroom_core::config::SecurityConfig;
use anteroom_core::error::{AnteroomError, Result};

use crate::hashing::constant_time_eq;
use crate::keyvalue::SharedStore;

/// Storage key for the session record.
const SESSION_KEY: &str = "admin_session";

/// Characters a session token is drawn from.
const TOKEN_ALPHABET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%^&*";

/// An authenticated admin session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token handed to the caller on login.
    pub token: String,
    pub created_at: DateTime<Utc>,
    /// Hard ceiling; activity cannot push a session past this.
    pub expires_at: DateTime<Utc>,
    /// Refreshed by `touch` on every tracked interaction.
    pub last_activity: DateTime<Utc>,
}

/// Generate a random token of `length` characters from the OS CSPRNG.
pub fn generate_token(rng: &SystemRandom, length: usize) -> Result<String> {
    let mut bytes = vec![0u8; length];
    rng.fill(&mut bytes)
        .map_err(|_| AnteroomError::TokenGeneration("system CSPRNG unavailable".into()))?;

    Ok(bytes
        .iter()
        .map(|b| TOKEN_ALPHABET[*b as usize % TOKEN_ALPHABET.len()] as char)
        .collect())
}

/// Session lifecycle over the ephemeral key-value store.
///
/// At most one session exists at a time; creating a new one overwrites
/// any prior record.
pub struct SessionStore {
    store: SharedStore,
    config: SecurityConfig,
    rng: SystemRandom,
}

impl SessionStore {
    pub fn new(store: SharedStore, config: SecurityConfig) -> Self {
        Self {
            store,
            config,
            rng: SystemRandom::new(),
        }
    }

    /// Create and persist a fresh session, overwriting any existing one.
    pub fn create(&self) -> Result<Session> {
        self.create_at(Utc::now())
    }

    #[instrument(skip_all)]
    pub fn create_at(&self, now: DateTime<Utc>) -> Result<Session> {
        let token = generate_token(&self.rng, self.config.token_length)?;
        let session = Session {
            token,
            created_at: now,
            expires_at: now + Duration::minutes(self.config.session_minutes),
            last_activity: now,
        };
        self.persist(&session)?;
        info!("session created");
        Ok(session)
    }

    /// Load the stored session, applying the absolute-expiry check only.
    ///
    /// An expired record is cleared before returning `None`.  An unreadable
    /// record also reads as `None` but is left in place; the next login
    /// overwrites it.
    pub fn load(&self) -> Option<Session> {
        self.load_at(Utc::now())
    }

    pub fn load_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let raw = match self.store.get(SESSION_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!(error = %e, "session read failed");
                return None;
            }
        };

        let session: Session = match serde_json::from_str(&raw) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "session record unreadable");
                return None;
            }
        };

        if now > session.expires_at {
            debug!("session expired, clearing");
            if let Err(e) = self.clear() {
                warn!(error = %e, "failed to clear expired session");
            }
            return None;
        }

        Some(session)
    }

    /// Load the stored session if it passes both the absolute-expiry and
    /// inactivity checks.  A session that fails either check is cleared.
    pub fn valid_session(&self) -> Option<Session> {
        self.valid_session_at(Utc::now())
    }

    pub fn valid_session_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let session = self.load_at(now)?;

        let idle = now.signed_duration_since(session.last_activity);
        if idle > Duration::minutes(self.config.inactivity_timeout_minutes) {
            debug!("session idle too long, clearing");
            if let Err(e) = self.clear() {
                warn!(error = %e, "failed to clear idle session");
            }
            return None;
        }

        Some(session)
    }

    /// True iff a session exists and is within both windows.
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.valid_session_at(now).is_some()
    }

    /// Record activity: refresh `last_activity` on the current session.
    ///
    /// No-op when no valid session exists.  Cannot push a session past its
    /// absolute expiry.
    pub fn touch(&self) -> Result<()> {
        self.touch_at(Utc::now())
    }

    pub fn touch_at(&self, now: DateTime<Utc>) -> Result<()> {
        let Some(mut session) = self.valid_session_at(now) else {
            return Ok(());
        };
        session.last_activity = now;
        self.persist(&session)
    }

    /// True iff a currently-valid session exists and its token matches.
    pub fn verify_token(&self, token: &str) -> bool {
        self.verify_token_at(token, Utc::now())
    }

    pub fn verify_token_at(&self, token: &str, now: DateTime<Utc>) -> bool {
        match self.valid_session_at(now) {
            Some(session) => constant_time_eq(&session.token, token),
            None => false,
        }
    }

    /// Delete the session record unconditionally.
    pub fn clear(&self) -> Result<()> {
        self.store.remove(SESSION_KEY)
    }

    fn persist(&self, session: &Session) -> Result<()> {
        let json = serde_json::to_string(session)?;
        self.store.put(SESSION_KEY, &json)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::TimeZone;

    use super::*;
    use crate::keyvalue::MemoryStore;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 9, 0, 0).unwrap()
    }

    fn store_with_backend(config: SecurityConfig) -> (SessionStore, SharedStore) {
        let backend: SharedStore = Arc::new(MemoryStore::new());
        let store = SessionStore::new(Arc::clone(&backend), config);
        (store, backend)
    }

    fn default_store() -> (SessionStore, SharedStore) {
        store_with_backend(SecurityConfig::default())
    }

    #[test]
    fn create_and_load() {
        let (store, _) = default_store();
        let t0 = base_time();

        let session = store.create_at(t0).expect("create");
        assert_eq!(session.token.len(), 32);
        assert_eq!(session.expires_at, t0 + Duration::minutes(15));

        let loaded = store.load_at(t0).expect("session present");
        assert_eq!(loaded.token, session.token);
    }

    #[test]
    fn tokens_draw_from_the_alphabet() {
        let (store, _) = default_store();
        let session = store.create_at(base_time()).expect("create");

        for c in session.token.bytes() {
            assert!(
                TOKEN_ALPHABET.contains(&c),
                "unexpected token character: {}",
                c as char
            );
        }
    }

    #[test]
    fn tokens_differ_between_sessions() {
        let (store, _) = default_store();
        let a = store.create_at(base_time()).expect("create");
        let b = store.create_at(base_time()).expect("create");
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn token_length_is_configurable() {
        let config = SecurityConfig {
            token_length: 16,
            ..SecurityConfig::default()
        };
        let (store, _) = store_with_backend(config);
        let session = store.create_at(base_time()).expect("create");
        assert_eq!(session.token.len(), 16);
    }

    #[test]
    fn second_create_overwrites_the_first() {
        let (store, _) = default_store();
        let t0 = base_time();

        let first = store.create_at(t0).expect("create");
        let second = store.create_at(t0 + Duration::minutes(1)).expect("create");

        let loaded = store.load_at(t0 + Duration::minutes(2)).expect("present");
        assert_eq!(loaded.token, second.token);
        assert_ne!(loaded.token, first.token);
    }

    #[test]
    fn absolute_expiry_is_a_hard_ceiling() {
        let (store, _) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        // Keep activity fresh inside the 5-minute inactivity window.
        for minutes in [4, 8, 12] {
            store.touch_at(t0 + Duration::minutes(minutes)).expect("touch");
        }
        assert!(store.is_valid_at(t0 + Duration::minutes(14)));

        // Activity after the ceiling cannot revive the session.
        store
            .touch_at(t0 + Duration::seconds(15 * 60 + 30))
            .expect("touch");
        assert!(!store.is_valid_at(t0 + Duration::minutes(16)));
    }

    #[test]
    fn expiry_boundary_is_strict() {
        // A long inactivity window isolates the absolute check.
        let config = SecurityConfig {
            inactivity_timeout_minutes: 60,
            ..SecurityConfig::default()
        };
        let (store, _) = store_with_backend(config);
        let t0 = base_time();
        store.create_at(t0).expect("create");

        assert!(store.is_valid_at(t0 + Duration::minutes(15)));
        assert!(!store.is_valid_at(t0 + Duration::minutes(15) + Duration::seconds(1)));
    }

    #[test]
    fn inactivity_expires_before_the_absolute_window() {
        let (store, _) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        // Untouched for 6 minutes: idle beyond the 5-minute window while
        // 9 minutes of absolute lifetime remain.
        assert!(!store.is_valid_at(t0 + Duration::minutes(6)));
    }

    #[test]
    fn inactivity_boundary_is_strict() {
        let (store, _) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        assert!(store.is_valid_at(t0 + Duration::minutes(5)));
    }

    #[test]
    fn touch_extends_the_inactivity_window() {
        let (store, _) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        store.touch_at(t0 + Duration::minutes(4)).expect("touch");

        // Idle time counts from the touch, not from creation.
        assert!(store.is_valid_at(t0 + Duration::minutes(8)));
    }

    #[test]
    fn touch_without_session_is_a_no_op() {
        let (store, backend) = default_store();
        store.touch_at(base_time()).expect("touch");
        assert!(backend.get("admin_session").expect("get").is_none());
    }

    #[test]
    fn expired_session_is_cleared_on_load() {
        let (store, backend) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        assert!(store.load_at(t0 + Duration::minutes(16)).is_none());
        assert!(
            backend.get(SESSION_KEY).expect("get").is_none(),
            "expired record must be removed"
        );
    }

    #[test]
    fn unreadable_record_reads_as_no_session_but_stays_put() {
        let (store, backend) = default_store();
        backend.put(SESSION_KEY, "{not json").expect("put");

        assert!(store.load_at(base_time()).is_none());
        assert!(
            backend.get(SESSION_KEY).expect("get").is_some(),
            "unreadable record is left for the next login to overwrite"
        );
    }

    #[test]
    fn clear_removes_the_session() {
        let (store, _) = default_store();
        let t0 = base_time();
        store.create_at(t0).expect("create");

        store.clear().expect("clear");
        assert!(store.load_at(t0).is_none());
        assert!(!store.is_valid_at(t0));
    }

    #[test]
    fn verify_token_matches_the_current_session() {
        let (store, _) = default_store();
        let t0 = base_time();
        let session = store.create_at(t0).expect("create");

        assert!(store.verify_token_at(&session.token, t0 + Duration::minutes(1)));
        assert!(!store.verify_token_at("not-the-token", t0 + Duration::minutes(1)));
    }

    #[test]
    fn verify_token_fails_after_expiry() {
        let (store, _) = default_store();
        let t0 = base_time();
        let session = store.create_at(t0).expect("create");

        assert!(!store.verify_token_at(&session.token, t0 + Duration::minutes(16)));
    }
}
