// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Print service adapter.
//
// Resolves the platform print manager from the host context on every call,
// lists installed or enabled print services through the strategy matching
// the device API level, and opens printer discovery sessions. Nothing that
// the platform returns is cached here.

use std::sync::Arc;

use spoolkit_core::config::BridgeConfig;
use spoolkit_core::error::{Result, SpoolError};
use spoolkit_core::types::{ApiLevel, ManagerMethod, ServiceDescriptor};
use tracing::{debug, info, warn};

use crate::listener::JobStateRelay;
use crate::query::{ServiceQuery, select_query};
use crate::service::{PrintServiceInfo, PrinterDiscoverySession, wrap_services};
use crate::traits::{PrintHost, PrintJobStateListener};

/// A registered job state listener and the platform proxy forwarding to it.
struct ListenerSlot<P> {
    relay: JobStateRelay,
    proxy: P,
}

/// Entry point for print service discovery on one host context.
pub struct PrintServiceAdapter<H: PrintHost> {
    host: H,
    api_level: ApiLevel,
    query: Box<dyn ServiceQuery<H>>,
    job_listener_supported: bool,
    listener: Option<ListenerSlot<H::Proxy>>,
}

impl<H: PrintHost> PrintServiceAdapter<H> {
    /// Build an adapter for the API level the host reports.
    ///
    /// Fails with `ReflectionFailure` if the print manager lacks a method the
    /// selected strategy needs. The host context is not touched, so a
    /// released context only surfaces once a query is made.
    pub fn new(host: H) -> Result<Self> {
        let level = host.api_level()?;
        Self::with_api_level(host, level)
    }

    /// Build an adapter honouring `config.api_level_override`.
    pub fn from_config(host: H, config: &BridgeConfig) -> Result<Self> {
        config.validate()?;
        match config.api_level() {
            Some(level) => {
                info!(api_level = %level, "using configured API level override");
                Self::with_api_level(host, level)
            }
            None => Self::new(host),
        }
    }

    /// Build an adapter for an explicit API level.
    pub fn with_api_level(host: H, api_level: ApiLevel) -> Result<Self> {
        let query = select_query::<H>(api_level);

        for &method in query.required_methods() {
            if !host.has_method(method)? {
                return Err(SpoolError::ReflectionFailure {
                    method: method.name().into(),
                    reason: format!(
                        "not exposed with signature {} at API level {api_level}",
                        method.signature()
                    ),
                });
            }
        }

        let job_listener_supported = host
            .has_method(ManagerMethod::AddPrintJobStateChangeListener)?
            && host.has_method(ManagerMethod::RemovePrintJobStateChangeListener)?;
        if !job_listener_supported {
            warn!(api_level = %api_level, "print job state listeners not supported by this host");
        }

        info!(
            api_level = %api_level,
            strategy = query.name(),
            job_listener_supported,
            "print service adapter ready"
        );

        Ok(Self {
            host,
            api_level,
            query,
            job_listener_supported,
            listener: None,
        })
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn api_level(&self) -> ApiLevel {
        self.api_level
    }

    /// Name of the selected version strategy (`legacy` or `filtered`).
    pub fn strategy(&self) -> &'static str {
        self.query.name()
    }

    /// Resolve the platform print manager from the host context.
    pub fn platform_print_service(&self) -> Result<H::Manager> {
        self.host
            .print_manager()?
            .ok_or(SpoolError::ServiceUnavailable)
    }

    /// All print services installed on the device, enabled or not.
    pub fn list_installed_services(&self) -> Result<Vec<PrintServiceInfo<H::Service>>> {
        let manager = self.platform_print_service()?;
        let services = wrap_services(self.query.list_installed(&self.host, &manager)?);
        debug!(count = services.len(), strategy = self.query.name(), "installed print services");
        Ok(services)
    }

    /// Print services the user has enabled.
    pub fn list_enabled_services(&self) -> Result<Vec<PrintServiceInfo<H::Service>>> {
        let manager = self.platform_print_service()?;
        let services = wrap_services(self.query.list_enabled(&self.host, &manager)?);
        debug!(count = services.len(), strategy = self.query.name(), "enabled print services");
        Ok(services)
    }

    /// Create a printer discovery session. Discovery itself is started by
    /// the caller on the returned session.
    pub fn start_discovery_session(&self) -> Result<PrinterDiscoverySession<H::Session>> {
        let manager = self.platform_print_service()?;
        let session = self.query.open_session(&self.host, &manager)?;
        debug!("printer discovery session created");
        Ok(PrinterDiscoverySession::new(session))
    }

    /// Describe services for the plugin's JavaScript side, in listing order.
    pub fn describe_services(
        &self,
        services: &[PrintServiceInfo<H::Service>],
    ) -> Result<Vec<ServiceDescriptor>> {
        services
            .iter()
            .map(|service| self.host.describe_service(service.raw()))
            .collect()
    }

    /// Whether this host can forward print job state changes at all.
    pub fn supports_job_state_listener(&self) -> bool {
        self.job_listener_supported
    }

    /// Register `listener` for print job state changes, replacing any
    /// previous registration.
    ///
    /// Only a weak reference is kept; dropping the last `Arc` silently
    /// stops delivery.
    pub fn set_print_job_state_listener(
        &mut self,
        listener: &Arc<dyn PrintJobStateListener>,
    ) -> Result<()> {
        if !self.job_listener_supported {
            return Err(SpoolError::ReflectionFailure {
                method: ManagerMethod::AddPrintJobStateChangeListener.name().into(),
                reason: format!("not exposed at API level {}", self.api_level),
            });
        }

        let manager = self.platform_print_service()?;
        if let Some(previous) = &self.listener {
            self.host.remove_job_state_proxy(&manager, &previous.proxy)?;
            self.listener = None;
        }

        let relay = JobStateRelay::new(listener);
        let proxy = self.host.add_job_state_proxy(&manager, relay.clone())?;
        self.listener = Some(ListenerSlot { relay, proxy });
        info!("print job state listener registered");
        Ok(())
    }

    /// Unregister the current listener, if any.
    ///
    /// If the host context is already gone the platform proxy cannot be
    /// reached; the host is told to forget it and the registration is
    /// dropped. Any other failure leaves the registration in place so the
    /// call can be retried.
    pub fn clear_print_job_state_listener(&mut self) -> Result<()> {
        if self.listener.is_none() {
            return Ok(());
        }

        let manager = self.host.print_manager()?;
        let Some(slot) = self.listener.take() else {
            return Ok(());
        };

        match manager {
            Some(manager) => {
                if let Err(e) = self.host.remove_job_state_proxy(&manager, &slot.proxy) {
                    self.listener = Some(slot);
                    return Err(e);
                }
                info!("print job state listener removed");
            }
            None => {
                self.host.forget_job_state_proxy(&slot.proxy);
                debug!("host context released, forgetting job state listener");
            }
        }
        Ok(())
    }

    /// Whether a listener is registered and still alive.
    pub fn has_print_job_state_listener(&self) -> bool {
        self.listener
            .as_ref()
            .is_some_and(|slot| slot.relay.is_live())
    }
}

impl<H: PrintHost> Drop for PrintServiceAdapter<H> {
    /// Best-effort unregistration; whatever cannot be removed from the
    /// platform is forgotten by the host.
    fn drop(&mut self) {
        let Some(slot) = self.listener.take() else {
            return;
        };

        match self.host.print_manager() {
            Ok(Some(manager)) => {
                if let Err(e) = self.host.remove_job_state_proxy(&manager, &slot.proxy) {
                    warn!(error = %e, "could not remove job state proxy on drop");
                    self.host.forget_job_state_proxy(&slot.proxy);
                }
            }
            Ok(None) => self.host.forget_job_state_proxy(&slot.proxy),
            Err(e) => {
                warn!(error = %e, "print manager unavailable on drop");
                self.host.forget_job_state_proxy(&slot.proxy);
            }
        }
    }
}
