// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Spoolkit print bridge.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Android API level (`Build.VERSION.SDK_INT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApiLevel(pub u32);

impl ApiLevel {
    /// KitKat (4.4), the first release shipping `android.print`.
    pub const KITKAT: ApiLevel = ApiLevel(19);

    /// Nougat (7.0) replaced `getInstalledPrintServices` /
    /// `getEnabledPrintServices` with `getPrintServices(int)`.
    pub const PRINT_SERVICE_FILTER: ApiLevel = ApiLevel(24);

    /// Whether the parameterized `getPrintServices(int)` accessor is the one
    /// to call at this level.
    pub fn has_service_filter(self) -> bool {
        self >= Self::PRINT_SERVICE_FILTER
    }
}

impl std::fmt::Display for ApiLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for ApiLevel {
    fn from(level: u32) -> Self {
        Self(level)
    }
}

/// Selection flags accepted by `PrintManager.getPrintServices(int)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceFilter {
    /// `PrintManager.ENABLED_SERVICES`.
    Enabled,
    /// `PrintManager.ALL_SERVICES`, enabled or not.
    All,
}

impl ServiceFilter {
    /// The integer flag value passed to the platform.
    pub fn flags(self) -> i32 {
        match self {
            Self::Enabled => 1,
            Self::All => 3,
        }
    }
}

/// Print manager methods the bridge may call, by name and JNI signature.
///
/// None of these are public SDK API; availability depends on the OS build,
/// which is why hosts are asked about each one up front.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManagerMethod {
    GetInstalledPrintServices,
    GetEnabledPrintServices,
    GetPrintServices,
    CreatePrinterDiscoverySession,
    AddPrintJobStateChangeListener,
    RemovePrintJobStateChangeListener,
}

impl ManagerMethod {
    pub fn name(self) -> &'static str {
        match self {
            Self::GetInstalledPrintServices => "getInstalledPrintServices",
            Self::GetEnabledPrintServices => "getEnabledPrintServices",
            Self::GetPrintServices => "getPrintServices",
            Self::CreatePrinterDiscoverySession => "createPrinterDiscoverySession",
            Self::AddPrintJobStateChangeListener => "addPrintJobStateChangeListener",
            Self::RemovePrintJobStateChangeListener => "removePrintJobStateChangeListener",
        }
    }

    pub fn signature(self) -> &'static str {
        match self {
            Self::GetInstalledPrintServices | Self::GetEnabledPrintServices => {
                "()Ljava/util/List;"
            }
            Self::GetPrintServices => "(I)Ljava/util/List;",
            Self::CreatePrinterDiscoverySession => "()Landroid/print/PrinterDiscoverySession;",
            Self::AddPrintJobStateChangeListener | Self::RemovePrintJobStateChangeListener => {
                "(Landroid/print/PrintManager$PrintJobStateChangeListener;)V"
            }
        }
    }
}

impl std::fmt::Display for ManagerMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Lifecycle states reported by `PrintJobInfo.getState()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PrintJobState {
    Created,
    Queued,
    Started,
    Blocked,
    Completed,
    Failed,
    Canceled,
}

impl PrintJobState {
    /// Map a `PrintJobInfo.STATE_*` constant. Unknown codes yield `None`.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Self::Created),
            2 => Some(Self::Queued),
            3 => Some(Self::Started),
            4 => Some(Self::Blocked),
            5 => Some(Self::Completed),
            6 => Some(Self::Failed),
            7 => Some(Self::Canceled),
            _ => None,
        }
    }

    /// Whether the job will not change state again.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Canceled)
    }
}

/// A job state transition forwarded from the platform print manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PrintJobEvent {
    /// Flattened `PrintJobId` as reported by the platform.
    pub job_id: String,
    /// New state, if the platform reported a known one.
    pub state: Option<PrintJobState>,
    /// When the bridge received the notification.
    pub received_at: DateTime<Utc>,
}

impl PrintJobEvent {
    pub fn new(job_id: impl Into<String>, state: Option<PrintJobState>) -> Self {
        Self {
            job_id: job_id.into(),
            state,
            received_at: Utc::now(),
        }
    }
}

/// Serializable description of one print service, handed to the plugin's
/// JavaScript side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceDescriptor {
    /// Flattened component name, e.g. `com.android.bips/.BuiltInPrintService`.
    pub id: String,
    /// User-visible label, when the host context could resolve one.
    pub label: Option<String>,
    pub package_name: Option<String>,
}
