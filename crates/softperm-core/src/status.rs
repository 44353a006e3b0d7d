//! Permission status model and classification precedence.
//!
//! The four-way status is the library's contract with callers: a prompt
//! answer classifies three ways (granted, denied once, permanently denied),
//! and a passive check adds "not requested" for permissions that were never
//! dispatched through the flow.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Outcome of a permission request or status check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    /// Permission is granted.
    Granted,
    /// The user declined, but may be asked again.
    DeniedOnce,
    /// Permanently denied; only the system settings screen can change it.
    Denied,
    /// Never requested through this library.
    NotRequested,
}

impl PermissionStatus {
    /// Whether the permission is usable right now.
    pub const fn is_granted(self) -> bool {
        matches!(self, Self::Granted)
    }

    /// Whether another prompt cannot change the answer.
    pub const fn is_permanently_denied(self) -> bool {
        matches!(self, Self::Denied)
    }

    /// Stable lowercase name for logs and display.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Granted => "granted",
            Self::DeniedOnce => "denied_once",
            Self::Denied => "denied",
            Self::NotRequested => "not_requested",
        }
    }
}

impl std::fmt::Display for PermissionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify one permission after the host prompt resolved.
///
/// Precedence: a grant wins outright; a denial with the platform's
/// show-rationale hint means the user can be asked again; a denial without
/// it is permanent.
pub const fn classify_prompt(granted: bool, shows_rationale: bool) -> PermissionStatus {
    if granted {
        PermissionStatus::Granted
    } else if shows_rationale {
        PermissionStatus::DeniedOnce
    } else {
        PermissionStatus::Denied
    }
}

/// Classify the current state of one permission without prompting.
///
/// Same precedence as [`classify_prompt`], except an ungranted permission
/// with no rationale hint that was never dispatched before classifies as
/// [`PermissionStatus::NotRequested`] instead of permanently denied.
pub const fn classify_check(
    granted: bool,
    shows_rationale: bool,
    requested_before: bool,
) -> PermissionStatus {
    if granted {
        PermissionStatus::Granted
    } else if shows_rationale {
        PermissionStatus::DeniedOnce
    } else if requested_before {
        PermissionStatus::Denied
    } else {
        PermissionStatus::NotRequested
    }
}

/// Per-permission statuses for a multiple-permission request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GrantReport {
    /// Status per requested permission.
    pub statuses: HashMap<String, PermissionStatus>,
    /// True while nothing is permanently denied.
    pub all_granted: bool,
}

impl GrantReport {
    /// Build a report from per-permission statuses.
    ///
    /// `all_granted` stays true as long as no permission is permanently
    /// denied: a denied-once answer can still flip on the next prompt, so it
    /// does not clear the flag.
    pub fn new(statuses: HashMap<String, PermissionStatus>) -> Self {
        let all_granted = !statuses.values().any(|s| s.is_permanently_denied());
        Self {
            statuses,
            all_granted,
        }
    }

    /// Status of one permission, if it was part of the request.
    pub fn status(&self, permission: &str) -> Option<PermissionStatus> {
        self.statuses.get(permission).copied()
    }
}
