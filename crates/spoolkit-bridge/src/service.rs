// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Wrapper types handed out across the platform boundary.

/// One installed or enabled print service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintServiceInfo<S> {
    raw: S,
}

impl<S> PrintServiceInfo<S> {
    pub fn new(raw: S) -> Self {
        Self { raw }
    }

    /// The platform descriptor this wraps.
    pub fn raw(&self) -> &S {
        &self.raw
    }

    pub fn into_raw(self) -> S {
        self.raw
    }
}

/// A printer discovery session as created by the print manager.
///
/// The session does nothing until the caller registers an observer and
/// starts discovery on the underlying platform object.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrinterDiscoverySession<T> {
    raw: T,
}

impl<T> PrinterDiscoverySession<T> {
    pub fn new(raw: T) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> &T {
        &self.raw
    }

    pub fn into_raw(self) -> T {
        self.raw
    }
}

/// Wrap a platform listing, preserving order. An absent list becomes empty.
pub(crate) fn wrap_services<S>(raw: Option<Vec<S>>) -> Vec<PrintServiceInfo<S>> {
    raw.unwrap_or_default()
        .into_iter()
        .map(PrintServiceInfo::new)
        .collect()
}
