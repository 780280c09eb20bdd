// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session watchdog.
//
// The credential gate expires sessions lazily, when they are next read.  An
// idle console never reads, so this task polls every half minute and
// announces the expiry instead of leaving the admin to find out at the next
// keystroke.

use std::sync::Arc;
use std::time::Duration;

use anteroom_security::CredentialGate;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::info;

const TICK: Duration = Duration::from_secs(30);

/// Spawn the watchdog task.  Abort the handle to stop it.
pub fn spawn(gate: Arc<CredentialGate>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(TICK);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        // Announce an expiry only on the signed-in to signed-out edge.
        let mut had_session = false;
        loop {
            ticker.tick().await;
            let valid = gate.is_session_valid();
            if had_session && !valid {
                info!("admin session expired");
                println!();
                println!("Session expired. Use `login` to sign in again.");
            }
            had_session = valid;
        }
    })
}
