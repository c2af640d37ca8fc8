// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Spoolkit.

use thiserror::Error;

/// Top-level error type for all Spoolkit operations.
#[derive(Debug, Error)]
pub enum SpoolError {
    // -- Print subsystem --
    /// The host context has been released; the print service cannot be
    /// resolved any more.
    #[error("print service unavailable: host context has been released")]
    ServiceUnavailable,

    /// The print manager does not expose a method shape we depend on.
    #[error("print manager method `{method}` could not be resolved: {reason}")]
    ReflectionFailure { method: String, reason: String },

    // -- Platform bridge --
    #[error("platform bridge error: {0}")]
    Bridge(String),

    #[error("feature not available on this platform")]
    PlatformUnavailable,

    // -- Configuration / persistence --
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SpoolError {
    /// Whether the error means the host environment cannot support the
    /// bridge at all. Callers should stop issuing requests rather than retry.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ReflectionFailure { .. } | Self::PlatformUnavailable
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SpoolError>;
