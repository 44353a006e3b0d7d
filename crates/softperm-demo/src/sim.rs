//! Simulated platform host and console notice sink.
//!
//! The demo has no real OS underneath it, so the host is driven by a
//! script fixed at startup: which permissions the simulated user grants,
//! and which denials carry the platform's ask-again hint.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::info;

use softperm_flow::{NoticeAck, NoticeSink, PermissionHost, SettingsNotice};

/// Platform host with a scripted user.
///
/// Permissions in `will_grant` are treated as the resulting platform
/// state, so a status check after the prompt reports them as granted.
pub struct SimHost {
    will_grant: HashSet<String>,
    rationale: HashSet<String>,
}

impl SimHost {
    pub const fn new(will_grant: HashSet<String>, rationale: HashSet<String>) -> Self {
        Self {
            will_grant,
            rationale,
        }
    }
}

#[async_trait]
impl PermissionHost for SimHost {
    fn is_granted(&self, permission: &str) -> bool {
        self.will_grant.contains(permission)
    }

    fn shows_rationale(&self, permission: &str) -> bool {
        self.rationale.contains(permission)
    }

    async fn prompt(&self, permissions: &[String]) -> HashMap<String, bool> {
        info!(permissions = ?permissions, "System permission dialog shown");
        permissions
            .iter()
            .map(|permission| {
                let granted = self.will_grant.contains(permission);
                info!(permission = %permission, granted, "Simulated user answered");
                (permission.clone(), granted)
            })
            .collect()
    }

    fn open_settings(&self) {
        info!("Opened the application settings screen");
    }
}

/// Notice sink that renders to the log and answers per the script.
pub struct ConsoleSink {
    tap_settings: bool,
}

impl ConsoleSink {
    pub const fn new(tap_settings: bool) -> Self {
        Self { tap_settings }
    }
}

#[async_trait]
impl NoticeSink for ConsoleSink {
    async fn show(&self, notice: SettingsNotice) -> NoticeAck {
        info!(
            message = %notice.message,
            action = %notice.action_label,
            background = ?notice.style.background,
            text = ?notice.style.text,
            "Settings notice shown"
        );
        if self.tap_settings {
            info!("Simulated user taps the settings action");
            NoticeAck::OpenSettings
        } else {
            info!("Simulated user dismisses the notice");
            NoticeAck::Dismissed
        }
    }
}
