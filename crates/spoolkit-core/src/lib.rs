// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolkit — Core types, configuration and error definitions shared by the
// bridge crate and the plugin command layer.

pub mod config;
pub mod error;
pub mod types;

pub use config::BridgeConfig;
pub use error::SpoolError;
pub use types::*;
