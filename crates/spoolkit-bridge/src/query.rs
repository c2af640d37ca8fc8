// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Version strategies for the print manager's service accessors.
//
// Before Nougat the print manager exposes one accessor per listing. From
// API 24 on there is a single `getPrintServices(int)` taking selection flags.
// One strategy is picked per adapter, at construction.

use spoolkit_core::error::Result;
use spoolkit_core::types::{ApiLevel, ManagerMethod, ServiceFilter};

use crate::traits::{PrintHost, ServiceLookup};

/// The print manager operations whose method shape depends on the API level.
pub trait ServiceQuery<H: PrintHost>: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Methods the host must expose for this strategy to work.
    fn required_methods(&self) -> &'static [ManagerMethod];

    /// Every installed service, enabled or not.
    fn list_installed(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>>;

    /// Enabled services only.
    fn list_enabled(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>>;

    fn open_session(&self, host: &H, manager: &H::Manager) -> Result<H::Session> {
        host.create_discovery_session(manager)
    }
}

/// API 19-23: `getInstalledPrintServices()` / `getEnabledPrintServices()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LegacyServiceQuery;

impl<H: PrintHost> ServiceQuery<H> for LegacyServiceQuery {
    fn name(&self) -> &'static str {
        "legacy"
    }

    fn required_methods(&self) -> &'static [ManagerMethod] {
        &[
            ManagerMethod::GetInstalledPrintServices,
            ManagerMethod::GetEnabledPrintServices,
            ManagerMethod::CreatePrinterDiscoverySession,
        ]
    }

    fn list_installed(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>> {
        host.list_services(manager, ServiceLookup::Installed)
    }

    fn list_enabled(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>> {
        host.list_services(manager, ServiceLookup::Enabled)
    }
}

/// API 24+: `getPrintServices(ALL_SERVICES | ENABLED_SERVICES)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FilteredServiceQuery;

impl<H: PrintHost> ServiceQuery<H> for FilteredServiceQuery {
    fn name(&self) -> &'static str {
        "filtered"
    }

    fn required_methods(&self) -> &'static [ManagerMethod] {
        &[
            ManagerMethod::GetPrintServices,
            ManagerMethod::CreatePrinterDiscoverySession,
        ]
    }

    fn list_installed(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>> {
        host.list_services(manager, ServiceLookup::Filtered(ServiceFilter::All))
    }

    fn list_enabled(&self, host: &H, manager: &H::Manager) -> Result<Option<Vec<H::Service>>> {
        host.list_services(manager, ServiceLookup::Filtered(ServiceFilter::Enabled))
    }
}

/// Pick the strategy for `level`.
pub fn select_query<H: PrintHost>(level: ApiLevel) -> Box<dyn ServiceQuery<H>> {
    if level.has_service_filter() {
        Box::new(FilteredServiceQuery)
    } else {
        Box::new(LegacyServiceQuery)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeHost;

    #[test]
    fn picks_strategy_by_level() {
        assert_eq!(select_query::<FakeHost>(ApiLevel(19)).name(), "legacy");
        assert_eq!(select_query::<FakeHost>(ApiLevel(23)).name(), "legacy");
        assert_eq!(select_query::<FakeHost>(ApiLevel(24)).name(), "filtered");
        assert_eq!(select_query::<FakeHost>(ApiLevel(34)).name(), "filtered");
    }

    #[test]
    fn strategies_never_share_listing_methods() {
        let legacy = <LegacyServiceQuery as ServiceQuery<FakeHost>>::required_methods(
            &LegacyServiceQuery,
        );
        let filtered = <FilteredServiceQuery as ServiceQuery<FakeHost>>::required_methods(
            &FilteredServiceQuery,
        );
        assert!(!legacy.contains(&ManagerMethod::GetPrintServices));
        assert!(!filtered.contains(&ManagerMethod::GetInstalledPrintServices));
        assert!(!filtered.contains(&ManagerMethod::GetEnabledPrintServices));
    }
}
