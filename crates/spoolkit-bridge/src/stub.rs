// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stub print host for desktop/CI builds where no native print manager exists.
//
// The stub claims every method shape so an adapter can be built, but never
// yields a print manager: every query fails with `ServiceUnavailable`.

use spoolkit_core::error::{Result, SpoolError};
use spoolkit_core::types::{ApiLevel, ManagerMethod, ServiceDescriptor};

use crate::listener::JobStateRelay;
use crate::traits::{PrintHost, ServiceLookup};

/// No-op host returned on non-Android platforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPrintHost;

impl PrintHost for StubPrintHost {
    type Manager = ();
    type Service = ();
    type Session = ();
    type Proxy = ();

    fn api_level(&self) -> Result<ApiLevel> {
        Ok(ApiLevel::KITKAT)
    }

    fn has_method(&self, _method: ManagerMethod) -> Result<bool> {
        Ok(true)
    }

    fn print_manager(&self) -> Result<Option<()>> {
        tracing::warn!("PrintHost::print_manager called on stub host");
        Ok(None)
    }

    fn list_services(&self, _manager: &(), _lookup: ServiceLookup) -> Result<Option<Vec<()>>> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn create_discovery_session(&self, _manager: &()) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn describe_service(&self, _service: &()) -> Result<ServiceDescriptor> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn add_job_state_proxy(&self, _manager: &(), _relay: JobStateRelay) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn remove_job_state_proxy(&self, _manager: &(), _proxy: &()) -> Result<()> {
        Err(SpoolError::PlatformUnavailable)
    }

    fn forget_job_state_proxy(&self, _proxy: &()) {}
}
