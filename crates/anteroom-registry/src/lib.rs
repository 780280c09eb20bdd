// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Anteroom — Registry: the admin dashboard's signup-request data layer.

pub mod registry;

pub use registry::RequestRegistry;
