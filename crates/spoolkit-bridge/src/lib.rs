// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Spoolkit — native print-service discovery bridge.
//
// `PrintServiceAdapter` lists installed/enabled print services and opens
// printer discovery sessions through a `PrintHost`. The host for the target
// OS is chosen at compile time: Android talks to `android.print.PrintManager`
// over JNI, everything else gets a stub.

pub mod adapter;
pub mod listener;
pub mod logging;
pub mod query;
pub mod service;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(not(target_os = "android"))]
pub mod stub;

#[cfg(test)]
mod testing;

pub use adapter::PrintServiceAdapter;
pub use listener::JobStateRelay;
pub use service::{PrintServiceInfo, PrinterDiscoverySession};
pub use traits::{PrintHost, PrintJobStateListener, ServiceLookup};

use spoolkit_core::config::BridgeConfig;
use spoolkit_core::error::Result;

/// Host implementation for the target operating system.
#[cfg(target_os = "android")]
pub type PlatformHost = android::AndroidPrintHost;

/// Host implementation for the target operating system.
#[cfg(not(target_os = "android"))]
pub type PlatformHost = stub::StubPrintHost;

/// Build the print host for the target operating system.
pub fn platform_host(config: &BridgeConfig) -> Result<PlatformHost> {
    #[cfg(target_os = "android")]
    {
        // Android: context and JavaVM come from the NDK glue.
        android::AndroidPrintHost::from_ndk_context(config)
    }
    #[cfg(not(target_os = "android"))]
    {
        let _ = config;
        Ok(stub::StubPrintHost)
    }
}

/// Build a ready adapter on the platform host, honouring `config`.
pub fn platform_adapter(config: &BridgeConfig) -> Result<PrintServiceAdapter<PlatformHost>> {
    let host = platform_host(config)?;
    PrintServiceAdapter::from_config(host, config)
}
