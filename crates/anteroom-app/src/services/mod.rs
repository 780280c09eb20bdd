// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Service layer — bridges the console to the anteroom backend crates.
//
// `app_services` assembles the credential gate and the request registry over
// the right storage backends; `data_dir` resolves where the durable pieces
// live on disk.

pub mod app_services;
pub mod data_dir;
