// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Failed-login tracking and lockout.
//
// Two records live in durable storage as plain JSON: a failed-attempt
// counter and a lockout marker written when the counter reaches the
// configured maximum.  Both survive restarts and session expiry.  Lockout
// expiry is lazy: no timer runs; the transition back to unlocked happens
// on whichever check first observes that the window has passed, and that
// check also resets the counter.
//
// The records trust the local wall clock and sit in plain storage, so
// anyone with direct storage access can defeat the lockout.  That is a
// known limit of a no-backend design.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use anteroom_core::config::SecurityConfig;
use anteroom_core::error::Result;

use crate::keyvalue::SharedStore;

/// Storage key for the failed-attempt counter.
const ATTEMPTS_KEY: &str = "login_attempts";
/// Storage key for the lockout marker.
const LOCKOUT_KEY: &str = "login_lockout";

/// Failed-attempt counter with the time of the most recent failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttemptRecord {
    pub count: u32,
    pub timestamp: DateTime<Utc>,
}

/// Marker written when the attempt counter reaches the configured maximum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutRecord {
    pub until: DateTime<Utc>,
}

/// Result of a lockout check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockoutStatus {
    pub locked: bool,
    /// Whole minutes until the lockout lifts, rounded up.  Zero when
    /// unlocked.
    pub remaining_minutes: i64,
}

/// Brute-force guard over the durable key-value store.
pub struct AttemptTracker {
    store: SharedStore,
    config: SecurityConfig,
}

impl AttemptTracker {
    pub fn new(store: SharedStore, config: SecurityConfig) -> Self {
        Self { store, config }
    }

    /// Consult the lockout marker, lazily clearing it once expired.
    ///
    /// Expiry also resets the attempt counter, so the admin starts over
    /// with a full allowance.
    pub fn status(&self) -> Result<LockoutStatus> {
        self.status_at(Utc::now())
    }

    pub fn status_at(&self, now: DateTime<Utc>) -> Result<LockoutStatus> {
        let Some(record) = self.load_lockout()? else {
            return Ok(LockoutStatus {
                locked: false,
                remaining_minutes: 0,
            });
        };

        if now < record.until {
            let remaining = record.until.signed_duration_since(now);
            return Ok(LockoutStatus {
                locked: true,
                // `now < until` keeps the numerator positive.
                remaining_minutes: (remaining.num_milliseconds() + 59_999) / 60_000,
            });
        }

        info!("lockout expired, resetting attempt counter");
        self.store.remove(LOCKOUT_KEY)?;
        self.store.remove(ATTEMPTS_KEY)?;
        Ok(LockoutStatus {
            locked: false,
            remaining_minutes: 0,
        })
    }

    /// Record one failed attempt and return the new count.
    ///
    /// When the count reaches the configured maximum the lockout marker is
    /// written with `until = now + lockout window`.
    pub fn record_failure(&self) -> Result<u32> {
        self.record_failure_at(Utc::now())
    }

    #[instrument(skip_all)]
    pub fn record_failure_at(&self, now: DateTime<Utc>) -> Result<u32> {
        let count = self.load_attempts()?.map_or(0, |r| r.count) + 1;
        let record = AttemptRecord {
            count,
            timestamp: now,
        };
        self.store
            .put(ATTEMPTS_KEY, &serde_json::to_string(&record)?)?;
        debug!(count, "failed login recorded");

        if count >= self.config.max_login_attempts {
            let lockout = LockoutRecord {
                until: now + Duration::minutes(self.config.lockout_minutes),
            };
            self.store
                .put(LOCKOUT_KEY, &serde_json::to_string(&lockout)?)?;
            warn!(count, "maximum failed logins reached, locking out");
        }

        Ok(count)
    }

    /// Reset the attempt counter (successful login).
    pub fn reset(&self) -> Result<()> {
        self.store.remove(ATTEMPTS_KEY)
    }

    /// Attempts left before the next failure triggers a lockout.
    pub fn remaining_attempts(&self) -> Result<u32> {
        let used = self.load_attempts()?.map_or(0, |r| r.count);
        Ok(self.config.max_login_attempts.saturating_sub(used))
    }

    fn load_attempts(&self) -> Result<Option<AttemptRecord>> {
        let Some(raw) = self.store.get(ATTEMPTS_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // Treated as zero; the next failure overwrites the record.
                warn!(error = %e, "attempt record unreadable, treating as empty");
                Ok(None)
            }
        }
    }

    fn load_lockout(&self) -> Result<Option<LockoutRecord>> {
        let Some(raw) = self.store.get(LOCKOUT_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                // Fail open: an unreadable marker would otherwise block
                // login forever, since nothing else ever rewrites it.
                warn!(error = %e, "lockout record unreadable, removing it");
                self.store.remove(LOCKOUT_KEY)?;
                Ok(None)
            }
        }
    }
}
