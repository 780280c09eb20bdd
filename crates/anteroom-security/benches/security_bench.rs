// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Criterion benchmarks for credential hashing, vault sealing, and
// encrypted store round trips in the anteroom-security crate.

use std::sync::Arc;

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use anteroom_security::hashing::sha256_hex;
use anteroom_security::{EncryptedStore, SharedStore, SqliteStore, Vault};

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

/// Benchmark the SHA-256 digest of a password-sized input.
///
/// This is the per-login cost: two of these run on every authentication
/// attempt (username and password).
fn bench_credential_digest(c: &mut Criterion) {
    let password = "Click1Secure@2024";

    c.bench_function("credential_digest", |b| {
        b.iter(|| {
            let hex = sha256_hex(black_box(password.as_bytes()));
            black_box(hex);
        });
    });
}

/// Benchmark AES-256-GCM sealing at various payload sizes.
///
/// Sizes: 1 KiB, 10 KiB, 100 KiB -- covering a handful of signup requests
/// up to a few years of accumulated entries in one blob.
fn bench_vault_seal(c: &mut Criterion) {
    let sizes: &[(&str, usize)] = &[
        ("1 KiB", 1024),
        ("10 KiB", 10 * 1024),
        ("100 KiB", 100 * 1024),
    ];

    let vault = Vault::new("bench-passphrase", "bench-salt");

    let mut group = c.benchmark_group("vault_seal");
    for &(label, size) in sizes {
        let plaintext = vec![0xABu8; size];
        group.bench_function(label, |b| {
            b.iter(|| {
                let blob = vault.encrypt(black_box(&plaintext)).expect("encrypt failed");
                black_box(blob);
            });
        });
    }
    group.finish();
}

/// Benchmark a full encrypt-then-decrypt round trip on a 10 KiB payload.
fn bench_encrypt_decrypt_roundtrip(c: &mut Criterion) {
    // Construct once so we measure sealing and opening, not key derivation.
    let vault = Vault::new("bench-passphrase", "bench-salt");
    let plaintext = vec![0x42u8; 10 * 1024]; // 10 KiB

    c.bench_function("encrypt_decrypt_roundtrip (10 KiB)", |b| {
        b.iter(|| {
            let blob = vault.encrypt(black_box(&plaintext)).expect("encrypt failed");
            let decrypted = vault.decrypt(&blob).expect("decrypt failed");
            assert_eq!(decrypted.len(), plaintext.len());
            black_box(decrypted);
        });
    });
}

/// Benchmark a store-then-retrieve cycle through an in-memory SQLite
/// backend.
///
/// This is the cost of one registry mutation: serialize, seal, upsert,
/// read back, open, parse.
fn bench_store_retrieve(c: &mut Criterion) {
    // Open the database once outside the hot loop so we measure
    // steady-state cycles, not schema creation.
    let backend: SharedStore =
        Arc::new(SqliteStore::open_in_memory().expect("open in-memory db"));
    let store = EncryptedStore::new(backend, "bench-passphrase", "bench-salt");

    let entries: Vec<String> = (0..20).map(|i| format!("request entry {i}")).collect();

    c.bench_function("store_retrieve (in-memory SQLite)", |b| {
        b.iter(|| {
            store
                .store(black_box("bench_requests"), black_box(&entries))
                .expect("store failed");
            let loaded: Vec<String> = store.retrieve("bench_requests").expect("value present");
            assert_eq!(loaded.len(), entries.len());
            black_box(loaded);
        });
    });
}

criterion_group!(
    benches,
    bench_credential_digest,
    bench_vault_seal,
    bench_encrypt_decrypt_roundtrip,
    bench_store_retrieve,
);
criterion_main!(benches);
