// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Platform-agnostic trait definitions for the host print subsystem.
//
// A `PrintHost` is the only thing that touches native objects. The adapter
// and its version strategies talk to it in terms of `ManagerMethod` and
// `ServiceLookup`, never in terms of JNI handles.

use spoolkit_core::error::Result;
use spoolkit_core::types::{ApiLevel, ManagerMethod, PrintJobEvent, ServiceDescriptor, ServiceFilter};

use crate::listener::JobStateRelay;

/// Which service listing to request from the print manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ServiceLookup {
    /// `getInstalledPrintServices()`, API < 24.
    Installed,
    /// `getEnabledPrintServices()`, API < 24.
    Enabled,
    /// `getPrintServices(flags)`, API >= 24.
    Filtered(ServiceFilter),
}

impl ServiceLookup {
    /// The print manager method this lookup invokes.
    pub fn method(self) -> ManagerMethod {
        match self {
            Self::Installed => ManagerMethod::GetInstalledPrintServices,
            Self::Enabled => ManagerMethod::GetEnabledPrintServices,
            Self::Filtered(_) => ManagerMethod::GetPrintServices,
        }
    }
}

/// Capability provider for one host application context.
///
/// The host owns the liveness check for its context: once the context has
/// been released, [`print_manager`](PrintHost::print_manager) answers
/// `Ok(None)` and the adapter reports `SpoolError::ServiceUnavailable`.
pub trait PrintHost {
    /// Handle to the platform print manager.
    type Manager;
    /// Raw print service descriptor.
    type Service;
    /// Raw printer discovery session.
    type Session;
    /// Platform-side proxy standing in for a job state listener.
    type Proxy;

    /// The OS API level of the running device.
    fn api_level(&self) -> Result<ApiLevel>;

    /// Whether the print manager exposes `method` with its expected signature.
    fn has_method(&self, method: ManagerMethod) -> Result<bool>;

    /// Resolve the `"print"` system service from the host context.
    ///
    /// Called on every query; implementations must not cache the result.
    fn print_manager(&self) -> Result<Option<Self::Manager>>;

    /// Invoke a service listing accessor. `Ok(None)` means the platform
    /// returned no list at all.
    fn list_services(
        &self,
        manager: &Self::Manager,
        lookup: ServiceLookup,
    ) -> Result<Option<Vec<Self::Service>>>;

    /// Invoke `createPrinterDiscoverySession()`.
    fn create_discovery_session(&self, manager: &Self::Manager) -> Result<Self::Session>;

    /// Read the identifying fields of a raw service.
    fn describe_service(&self, service: &Self::Service) -> Result<ServiceDescriptor>;

    /// Install a platform proxy that forwards job state changes to `relay`.
    fn add_job_state_proxy(&self, manager: &Self::Manager, relay: JobStateRelay)
    -> Result<Self::Proxy>;

    /// Uninstall a proxy previously returned by
    /// [`add_job_state_proxy`](PrintHost::add_job_state_proxy).
    fn remove_job_state_proxy(&self, manager: &Self::Manager, proxy: &Self::Proxy) -> Result<()>;

    /// Release host-side bookkeeping for a proxy that can no longer be
    /// removed from the platform, e.g. because the context is gone.
    fn forget_job_state_proxy(&self, proxy: &Self::Proxy);
}

/// Callback invoked by the platform whenever a submitted print job changes
/// state. The bridge only forwards these; it never interprets them.
pub trait PrintJobStateListener: Send + Sync {
    fn on_print_job_state_changed(&self, event: &PrintJobEvent);
}
