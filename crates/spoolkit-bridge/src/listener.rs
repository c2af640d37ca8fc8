// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Weak forwarding from platform job-state proxies to caller listeners.

use std::sync::{Arc, Weak};

use spoolkit_core::types::PrintJobEvent;
use tracing::debug;

use crate::traits::PrintJobStateListener;

/// What the host's platform proxy calls into.
///
/// Holds the listener weakly so a registered proxy never keeps the caller's
/// listener alive. Events arriving after the listener is gone are dropped.
#[derive(Clone)]
pub struct JobStateRelay {
    listener: Weak<dyn PrintJobStateListener>,
}

impl JobStateRelay {
    pub fn new(listener: &Arc<dyn PrintJobStateListener>) -> Self {
        Self {
            listener: Arc::downgrade(listener),
        }
    }

    /// Forward `event`. Returns `false` if the listener has been dropped.
    pub fn deliver(&self, event: &PrintJobEvent) -> bool {
        match self.listener.upgrade() {
            Some(listener) => {
                listener.on_print_job_state_changed(event);
                true
            }
            None => {
                debug!(job_id = %event.job_id, "job state listener gone, dropping event");
                false
            }
        }
    }

    /// Whether the listener is still alive.
    pub fn is_live(&self) -> bool {
        self.listener.strong_count() > 0
    }
}

impl std::fmt::Debug for JobStateRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobStateRelay")
            .field("live", &self.is_live())
            .finish()
    }
}
