// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// In-memory print host used by the unit tests. Records every listing call
// and lets tests release the context or fire job state events.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};

use spoolkit_core::error::{Result, SpoolError};
use spoolkit_core::types::{ApiLevel, ManagerMethod, PrintJobEvent, ServiceDescriptor, ServiceFilter};

use crate::listener::JobStateRelay;
use crate::traits::{PrintHost, ServiceLookup};

pub(crate) struct FakeHost {
    api_level: ApiLevel,
    installed: Option<Vec<String>>,
    enabled: Option<Vec<String>>,
    missing: Vec<ManagerMethod>,
    fail_session: bool,
    released: AtomicBool,
    fail_manager: AtomicBool,
    fail_add: AtomicBool,
    fail_remove: AtomicBool,
    manager_lookups: AtomicUsize,
    next_id: AtomicU32,
    calls: Mutex<Vec<ServiceLookup>>,
    proxies: Arc<Mutex<Vec<(u32, JobStateRelay)>>>,
    forgotten: Arc<Mutex<Vec<u32>>>,
}

impl FakeHost {
    pub(crate) fn new(level: u32) -> Self {
        Self {
            api_level: ApiLevel(level),
            installed: Some(Vec::new()),
            enabled: Some(Vec::new()),
            missing: Vec::new(),
            fail_session: false,
            released: AtomicBool::new(false),
            fail_manager: AtomicBool::new(false),
            fail_add: AtomicBool::new(false),
            fail_remove: AtomicBool::new(false),
            manager_lookups: AtomicUsize::new(0),
            next_id: AtomicU32::new(1),
            calls: Mutex::new(Vec::new()),
            proxies: Arc::new(Mutex::new(Vec::new())),
            forgotten: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub(crate) fn with_services(mut self, installed: &[&str], enabled: &[&str]) -> Self {
        self.installed = Some(installed.iter().map(|s| s.to_string()).collect());
        self.enabled = Some(enabled.iter().map(|s| s.to_string()).collect());
        self
    }

    /// The platform answers `null` instead of a list.
    pub(crate) fn without_lists(mut self) -> Self {
        self.installed = None;
        self.enabled = None;
        self
    }

    pub(crate) fn missing(mut self, method: ManagerMethod) -> Self {
        self.missing.push(method);
        self
    }

    pub(crate) fn failing_session(mut self) -> Self {
        self.fail_session = true;
        self
    }

    /// Simulate the host releasing its context.
    pub(crate) fn release(&self) {
        self.released.store(true, Ordering::SeqCst);
    }

    /// Make `print_manager` fail with a bridge error until switched off.
    pub(crate) fn set_manager_failure(&self, fail: bool) {
        self.fail_manager.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_add_failure(&self, fail: bool) {
        self.fail_add.store(fail, Ordering::SeqCst);
    }

    pub(crate) fn set_remove_failure(&self, fail: bool) {
        self.fail_remove.store(fail, Ordering::SeqCst);
    }

    /// Proxies handed to `forget_job_state_proxy`.
    pub(crate) fn forgotten(&self) -> Vec<u32> {
        self.forgotten.lock().unwrap().clone()
    }

    /// Handles on the proxy bookkeeping that outlive the host itself.
    pub(crate) fn ledgers(&self) -> (Arc<Mutex<Vec<(u32, JobStateRelay)>>>, Arc<Mutex<Vec<u32>>>) {
        (Arc::clone(&self.proxies), Arc::clone(&self.forgotten))
    }

    pub(crate) fn calls(&self) -> Vec<ServiceLookup> {
        self.calls.lock().unwrap().clone()
    }

    pub(crate) fn manager_lookups(&self) -> usize {
        self.manager_lookups.load(Ordering::SeqCst)
    }

    pub(crate) fn proxy_count(&self) -> usize {
        self.proxies.lock().unwrap().len()
    }

    /// Fire `event` at every installed proxy; returns how many delivered.
    pub(crate) fn emit(&self, event: &PrintJobEvent) -> usize {
        let relays: Vec<JobStateRelay> = self
            .proxies
            .lock()
            .unwrap()
            .iter()
            .map(|(_, relay)| relay.clone())
            .collect();
        relays.iter().filter(|relay| relay.deliver(event)).count()
    }
}

impl PrintHost for FakeHost {
    type Manager = ();
    type Service = String;
    type Session = u32;
    type Proxy = u32;

    fn api_level(&self) -> Result<ApiLevel> {
        Ok(self.api_level)
    }

    fn has_method(&self, method: ManagerMethod) -> Result<bool> {
        Ok(!self.missing.contains(&method))
    }

    fn print_manager(&self) -> Result<Option<()>> {
        self.manager_lookups.fetch_add(1, Ordering::SeqCst);
        if self.fail_manager.load(Ordering::SeqCst) {
            return Err(SpoolError::Bridge("getSystemService(print) threw".into()));
        }
        if self.released.load(Ordering::SeqCst) {
            Ok(None)
        } else {
            Ok(Some(()))
        }
    }

    fn list_services(&self, _manager: &(), lookup: ServiceLookup) -> Result<Option<Vec<String>>> {
        self.calls.lock().unwrap().push(lookup);
        let listing = match lookup {
            ServiceLookup::Installed | ServiceLookup::Filtered(ServiceFilter::All) => {
                self.installed.clone()
            }
            ServiceLookup::Enabled | ServiceLookup::Filtered(ServiceFilter::Enabled) => {
                self.enabled.clone()
            }
        };
        Ok(listing)
    }

    fn create_discovery_session(&self, _manager: &()) -> Result<u32> {
        if self.fail_session {
            return Err(SpoolError::Bridge(
                "createPrinterDiscoverySession threw".into(),
            ));
        }
        Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
    }

    fn describe_service(&self, service: &String) -> Result<ServiceDescriptor> {
        Ok(ServiceDescriptor {
            id: service.clone(),
            label: Some(service.to_uppercase()),
            package_name: None,
        })
    }

    fn add_job_state_proxy(&self, _manager: &(), relay: JobStateRelay) -> Result<u32> {
        if self.fail_add.load(Ordering::SeqCst) {
            return Err(SpoolError::Bridge("addPrintJobStateChangeListener threw".into()));
        }
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        self.proxies.lock().unwrap().push((id, relay));
        Ok(id)
    }

    fn remove_job_state_proxy(&self, _manager: &(), proxy: &u32) -> Result<()> {
        if self.fail_remove.load(Ordering::SeqCst) {
            return Err(SpoolError::Bridge(
                "removePrintJobStateChangeListener threw".into(),
            ));
        }
        self.proxies.lock().unwrap().retain(|(id, _)| id != proxy);
        Ok(())
    }

    fn forget_job_state_proxy(&self, proxy: &u32) {
        self.forgotten.lock().unwrap().push(*proxy);
    }
}
