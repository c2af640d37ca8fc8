// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bridge configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, SpoolError};
use crate::types::ApiLevel;

/// Settings the plugin passes when it brings up the bridge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Force the API level used to pick the print manager method shape,
    /// instead of reading `Build.VERSION.SDK_INT`.
    pub api_level_override: Option<u32>,
    /// JNI class name of the Java shim implementing
    /// `PrintManager.PrintJobStateChangeListener`.
    pub job_listener_class: String,
    /// `tracing` filter directive used when `RUST_LOG` is unset.
    pub log_filter: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            api_level_override: None,
            job_listener_class: "dev/spoolkit/PrintJobStateProxy".into(),
            log_filter: "info".into(),
        }
    }
}

impl BridgeConfig {
    /// Parse and validate a JSON document. Missing keys take defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read a JSON config file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn validate(&self) -> Result<()> {
        if self.job_listener_class.trim().is_empty() {
            return Err(SpoolError::Config("jobListenerClass must not be empty".into()));
        }
        if self.job_listener_class.contains('.') {
            return Err(SpoolError::Config(format!(
                "jobListenerClass must use JNI form (a/b/C), got {}",
                self.job_listener_class
            )));
        }
        match self.api_level() {
            Some(level) if level < ApiLevel::KITKAT => {
                return Err(SpoolError::Config(format!(
                    "apiLevelOverride {level} predates android.print (API {})",
                    ApiLevel::KITKAT
                )));
            }
            _ => {}
        }
        Ok(())
    }

    /// The forced API level, if any.
    pub fn api_level(&self) -> Option<ApiLevel> {
        self.api_level_override.map(ApiLevel)
    }
}
