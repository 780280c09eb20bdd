// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Anteroom — Offline-First Admin Portal
//
// Entry point. Initialises logging and backend services, starts the session
// watchdog, and runs the interactive console.

mod console;
mod monitor;
mod services;

use services::app_services::AppServices;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Anteroom starting");

    let services = match AppServices::init() {
        Ok(s) => {
            tracing::info!("backend services initialised");
            s
        }
        Err(e) => {
            tracing::error!(error = %e, "persistent storage failed, using in-memory fallback");
            AppServices::fallback()
        }
    };

    let watchdog = monitor::spawn(services.gate_handle());

    if let Err(e) = console::run(services).await {
        tracing::error!(error = %e, "console terminated");
    }

    watchdog.abort();
}
