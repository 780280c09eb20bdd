// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Anteroom — Security: key-value storage, encrypted vault, sessions, and
// the credential gate.

pub mod gate;
pub mod hashing;
pub mod keyvalue;
pub mod lockout;
pub mod session;
pub mod vault;

pub use gate::{AuthOutcome, CredentialDirectory, CredentialGate, SingleAdmin};
pub use keyvalue::{KeyValueStore, MemoryStore, SharedStore, SqliteStore};
pub use lockout::LockoutStatus;
pub use session::Session;
pub use vault::{EncryptedStore, Vault};
