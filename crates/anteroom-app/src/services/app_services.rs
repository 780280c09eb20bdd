// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Central service layer — initialises the storage backends, the credential
// gate, and the request registry, and hands them to the console.
//
// Attempt counters, lockout markers, and signup requests live in SQLite so
// they survive restarts.  The admin session lives in a process-local store
// so closing the app always signs the admin out.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anteroom_core::error::Result;
use anteroom_core::AppConfig;
use anteroom_registry::RequestRegistry;
use anteroom_security::{
    CredentialGate, EncryptedStore, MemoryStore, SharedStore, SingleAdmin, SqliteStore,
};
use tracing::{debug, info, warn};

use super::data_dir;

/// Shared application services used by the console and the session watchdog.
///
/// All fields are cheaply cloneable (Arc-wrapped) so the struct can be handed
/// to tasks and helpers without lifetime issues.
#[derive(Clone)]
pub struct AppServices {
    gate: Arc<CredentialGate>,
    registry: Arc<RequestRegistry>,
    config: Arc<AppConfig>,
    data_dir: Option<PathBuf>,
}

impl AppServices {
    /// Initialise all services over durable storage.  Call once at startup.
    ///
    /// Creates the data directory, loads (or writes) the configuration file,
    /// and opens the SQLite database.
    pub fn init() -> Result<Self> {
        let dir = data_dir::data_dir();
        info!(path = %dir.display(), "initialising app services");

        let mut config = match load_config(&dir) {
            Ok(Some(config)) => config,
            Ok(None) => {
                let config = AppConfig::default();
                persist_config(&dir, &config)?;
                info!("wrote default config");
                config
            }
            Err(e) => {
                warn!(error = %e, "config file unreadable, using defaults");
                AppConfig::default()
            }
        };
        apply_env_overrides(&mut config);

        let durable: SharedStore = Arc::new(SqliteStore::open(dir.join(DB_FILE))?);
        let ephemeral: SharedStore = Arc::new(MemoryStore::new());

        info!("app services initialised");

        Ok(Self::assemble(config, durable, ephemeral, Some(dir)))
    }

    /// Fully in-memory services for when durable storage is unavailable.
    ///
    /// Sessions, attempt counters, and signup requests all vanish on exit.
    pub fn fallback() -> Self {
        let mut config = AppConfig::default();
        apply_env_overrides(&mut config);

        let durable: SharedStore = Arc::new(MemoryStore::new());
        let ephemeral: SharedStore = Arc::new(MemoryStore::new());

        Self::assemble(config, durable, ephemeral, None)
    }

    fn assemble(
        config: AppConfig,
        durable: SharedStore,
        ephemeral: SharedStore,
        data_dir: Option<PathBuf>,
    ) -> Self {
        let gate = CredentialGate::new(
            config.security.clone(),
            Box::new(SingleAdmin::new(config.admin.clone())),
            Arc::clone(&durable),
            ephemeral,
        );
        let requests =
            EncryptedStore::new(durable, &config.vault.passphrase, &config.vault.salt);

        Self {
            gate: Arc::new(gate),
            registry: Arc::new(RequestRegistry::new(requests)),
            config: Arc::new(config),
            data_dir,
        }
    }

    // -- Access --------------------------------------------------------------

    pub fn gate(&self) -> &CredentialGate {
        &self.gate
    }

    /// Owned gate handle for long-lived tasks.
    pub fn gate_handle(&self) -> Arc<CredentialGate> {
        Arc::clone(&self.gate)
    }

    pub fn registry(&self) -> &RequestRegistry {
        &self.registry
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// `None` when running on the in-memory fallback.
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }
}

// -- Environment overrides ----------------------------------------------------

/// Apply credential and passphrase overrides from the environment.
///
/// `ANTEROOM_ADMIN_USERNAME_HASH` and `ANTEROOM_ADMIN_PASSWORD_HASH` replace
/// the reference SHA-256 digests; `ANTEROOM_VAULT_PASSPHRASE` replaces the
/// encrypted-store passphrase.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(hash) = std::env::var("ANTEROOM_ADMIN_USERNAME_HASH") {
        debug!("admin username digest taken from environment");
        config.admin.username_hash = hash;
    }
    if let Ok(hash) = std::env::var("ANTEROOM_ADMIN_PASSWORD_HASH") {
        debug!("admin password digest taken from environment");
        config.admin.password_hash = hash;
    }
    if let Ok(passphrase) = std::env::var("ANTEROOM_VAULT_PASSPHRASE") {
        debug!("vault passphrase taken from environment");
        config.vault.passphrase = passphrase;
    }
}

// -- Config file persistence --------------------------------------------------

const CONFIG_FILE: &str = "config.json";
const DB_FILE: &str = "anteroom.db";

fn load_config(dir: &Path) -> Result<Option<AppConfig>> {
    let path = dir.join(CONFIG_FILE);
    let data = match std::fs::read_to_string(&path) {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let config = serde_json::from_str(&data)?;
    debug!(path = %path.display(), "loaded config");
    Ok(Some(config))
}

fn persist_config(dir: &Path, config: &AppConfig) -> Result<()> {
    let path = dir.join(CONFIG_FILE);
    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;
    Ok(())
}
