//! Host platform seams.
//!
//! A real binding forwards these calls to the OS permission APIs and UI
//! toolkit. Tests and the demo binary plug in scripted implementations.

use std::collections::HashMap;

use async_trait::async_trait;

use crate::notice::{NoticeAck, SettingsNotice};

/// Platform side of the permission flow.
#[async_trait]
pub trait PermissionHost: Send + Sync {
    /// Current grant state for a permission.
    fn is_granted(&self, permission: &str) -> bool;

    /// Platform hint that the user denied this permission before but may be
    /// asked again. Hosts running below the platform version that introduced
    /// the hint return `false`.
    fn shows_rationale(&self, permission: &str) -> bool;

    /// Show the system permission dialog and resolve once with the user's
    /// answer, one grant flag per requested permission. Permissions missing
    /// from the returned map are treated as not granted.
    async fn prompt(&self, permissions: &[String]) -> HashMap<String, bool>;

    /// Open the per-app system settings screen.
    fn open_settings(&self);
}

/// Renders the permanently-denied settings notice.
#[async_trait]
pub trait NoticeSink: Send + Sync {
    /// Display the notice and resolve once the user dismisses it or taps the
    /// settings action.
    async fn show(&self, notice: SettingsNotice) -> NoticeAck;
}
