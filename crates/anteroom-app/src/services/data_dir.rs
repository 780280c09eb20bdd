// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resolves where the portal keeps its files on disk.

use std::path::PathBuf;

/// Return the application data directory, creating it if needed.
///
/// Holds the SQLite database and the persisted configuration file.
pub fn data_dir() -> PathBuf {
    let dir = base_dir().join("anteroom");
    std::fs::create_dir_all(&dir).ok();
    dir
}

/// Resolution order: `XDG_DATA_HOME`, then `~/.local/share`, then `/tmp`
/// for accounts with no home directory.
fn base_dir() -> PathBuf {
    match std::env::var_os("XDG_DATA_HOME") {
        Some(xdg) => PathBuf::from(xdg),
        None => match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".local/share"),
            None => PathBuf::from("/tmp"),
        },
    }
}
