//! Dispatch and classification engine.
//!
//! Drives one permission request from descriptor to classified outcome and
//! raises the settings notice when a permanently denied permission should
//! be handled.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use softperm_core::config::NoticeConfig;
use softperm_core::history::HistoryStore;
use softperm_core::status::{GrantReport, PermissionStatus, classify_check, classify_prompt};

use crate::host::{NoticeSink, PermissionHost};
use crate::notice::{NoticeAck, NoticeGate, NoticeStyle, SettingsNotice};
use crate::request::PermissionRequest;

/// Classified result of a dispatched request.
#[derive(Debug, Clone)]
pub enum RequestOutcome {
    /// Answer for a single-permission request.
    Single {
        permission: String,
        status: PermissionStatus,
    },
    /// Answers for a multiple-permission request.
    Multiple(GrantReport),
}

/// Permission flow engine.
///
/// Owns the host seams, the request history, and the notice gate. Shared by
/// reference; concurrent dispatches are independent.
pub struct PermissionFlow {
    host: Arc<dyn PermissionHost>,
    notices: Arc<NoticeGate>,
    history: HistoryStore,
    notice_config: NoticeConfig,
    retained_style: RwLock<Option<NoticeStyle>>,
}

impl PermissionFlow {
    /// Create a flow engine over a host and a notice sink.
    pub fn new(
        host: Arc<dyn PermissionHost>,
        sink: Arc<dyn NoticeSink>,
        history: HistoryStore,
        notice_config: NoticeConfig,
    ) -> Self {
        Self {
            host,
            notices: Arc::new(NoticeGate::new(sink)),
            history,
            notice_config,
            retained_style: RwLock::new(None),
        }
    }

    /// Dispatch a permission request.
    ///
    /// Resolves exactly once with the classified outcome. Returns `None`
    /// when the request targets no usable permission names; in that case the
    /// host is never prompted and no history is written.
    pub async fn dispatch(&self, request: PermissionRequest) -> Option<RequestOutcome> {
        let permissions = request.effective_permissions();
        if permissions.is_empty() {
            warn!("Dispatch without permission names, nothing to request");
            return None;
        }

        let request_id = Uuid::new_v4().to_string();
        let multiple = request.is_multiple();
        info!(
            request_id = %request_id,
            permissions = ?permissions,
            multiple,
            "Dispatching permission request"
        );

        // Resolve the style before this request can replace the retained one.
        let style = match request.style {
            Some(style) => Some(style),
            None => *self.retained_style.read().await,
        };

        // Flag every permission before prompting, so a later check can tell
        // "never requested" apart from "permanently denied" even if the
        // process dies mid-prompt.
        for permission in &permissions {
            if let Err(e) = self.history.mark_requested(permission).await {
                warn!(permission, error = %e, "Failed to record request history");
            }
        }

        let answers = self.host.prompt(&permissions).await;

        let mut statuses = HashMap::with_capacity(permissions.len());
        for permission in permissions {
            let granted = answers.get(permission.as_str()).copied().unwrap_or(false);
            let shows_rationale = !granted && self.host.shows_rationale(&permission);
            let status = classify_prompt(granted, shows_rationale);
            debug!(
                request_id = %request_id,
                permission = %permission,
                status = %status,
                "Classified prompt answer"
            );
            statuses.insert(permission, status);
        }

        let any_permanently_denied = statuses.values().any(|s| s.is_permanently_denied());
        if request.handle_permanently_denied && any_permanently_denied {
            let message = request
                .fallback_message
                .clone()
                .unwrap_or_else(|| self.notice_config.fallback_message.clone());
            self.spawn_notice(message, style.unwrap_or_default(), request_id.clone());
        }

        if request.retain_style {
            *self.retained_style.write().await = request.style;
        }

        let outcome = if multiple {
            RequestOutcome::Multiple(GrantReport::new(statuses))
        } else {
            // Single target: exactly one classified entry.
            let (permission, status) = statuses.into_iter().next()?;
            RequestOutcome::Single { permission, status }
        };

        info!(request_id = %request_id, "Permission request resolved");
        Some(outcome)
    }

    /// Classify the current state of one permission without prompting.
    pub async fn check(&self, permission: &str) -> PermissionStatus {
        let permission = permission.trim();
        if permission.is_empty() {
            return PermissionStatus::NotRequested;
        }

        let granted = self.host.is_granted(permission);
        let shows_rationale = !granted && self.host.shows_rationale(permission);
        let requested_before = match self.history.was_requested(permission).await {
            Ok(flag) => flag,
            Err(e) => {
                warn!(
                    permission,
                    error = %e,
                    "Failed to read request history, treating as never requested"
                );
                false
            }
        };

        let status = classify_check(granted, shows_rationale, requested_before);
        debug!(permission, status = %status, "Checked permission");
        status
    }

    /// Whether the settings notice is currently visible.
    pub fn notice_visible(&self) -> bool {
        self.notices.is_visible()
    }

    /// Run the notice lifecycle on a detached task. The dispatch outcome is
    /// delivered without waiting for the user to act on the notice.
    fn spawn_notice(&self, message: String, style: NoticeStyle, request_id: String) {
        let gate = Arc::clone(&self.notices);
        let host = Arc::clone(&self.host);
        let notice = SettingsNotice {
            message,
            action_label: self.notice_config.settings_action_label.clone(),
            style,
        };

        tokio::spawn(async move {
            match gate.present(notice).await {
                Some(NoticeAck::OpenSettings) => {
                    info!(request_id = %request_id, "Opening settings from notice action");
                    host.open_settings();
                }
                Some(NoticeAck::Dismissed) => {
                    debug!(request_id = %request_id, "Settings notice dismissed");
                }
                None => {}
            }
        });
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;

    /// Host with a scripted prompt answer per permission.
    struct ScriptedHost {
        granted: Mutex<HashMap<String, bool>>,
        rationale: Mutex<HashMap<String, bool>>,
        prompts: AtomicUsize,
    }

    impl ScriptedHost {
        fn new() -> Self {
            Self {
                granted: Mutex::new(HashMap::new()),
                rationale: Mutex::new(HashMap::new()),
                prompts: AtomicUsize::new(0),
            }
        }

        fn will_grant(self, permission: &str) -> Self {
            self.granted
                .lock()
                .unwrap()
                .insert(permission.to_string(), true);
            self
        }

        fn with_rationale(self, permission: &str) -> Self {
            self.rationale
                .lock()
                .unwrap()
                .insert(permission.to_string(), true);
            self
        }
    }

    #[async_trait]
    impl PermissionHost for ScriptedHost {
        fn is_granted(&self, permission: &str) -> bool {
            self.granted
                .lock()
                .unwrap()
                .get(permission)
                .copied()
                .unwrap_or(false)
        }

        fn shows_rationale(&self, permission: &str) -> bool {
            self.rationale
                .lock()
                .unwrap()
                .get(permission)
                .copied()
                .unwrap_or(false)
        }

        async fn prompt(&self, permissions: &[String]) -> HashMap<String, bool> {
            self.prompts.fetch_add(1, Ordering::SeqCst);
            let granted = self.granted.lock().unwrap();
            permissions
                .iter()
                .map(|p| (p.clone(), granted.get(p).copied().unwrap_or(false)))
                .collect()
        }

        fn open_settings(&self) {}
    }

    /// Sink that records shown notices and immediately dismisses them.
    struct RecordingSink {
        shown: Mutex<Vec<SettingsNotice>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                shown: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl NoticeSink for RecordingSink {
        async fn show(&self, notice: SettingsNotice) -> NoticeAck {
            self.shown.lock().unwrap().push(notice);
            NoticeAck::Dismissed
        }
    }

    async fn test_flow(
        host: ScriptedHost,
    ) -> (PermissionFlow, Arc<ScriptedHost>, Arc<RecordingSink>) {
        let host = Arc::new(host);
        let sink = Arc::new(RecordingSink::new());
        let history = HistoryStore::open_in_memory().await.unwrap();
        let flow = PermissionFlow::new(
            host.clone(),
            sink.clone(),
            history,
            NoticeConfig::default(),
        );
        (flow, host, sink)
    }

    #[tokio::test]
    async fn granted_single_request() {
        let (flow, _host, _sink) = test_flow(ScriptedHost::new().will_grant("camera")).await;

        let outcome = flow
            .dispatch(PermissionRequest::single("camera"))
            .await
            .unwrap();

        match outcome {
            RequestOutcome::Single { permission, status } => {
                assert_eq!(permission, "camera");
                assert_eq!(status, PermissionStatus::Granted);
            }
            RequestOutcome::Multiple(_) => panic!("expected single outcome"),
        }
    }

    #[tokio::test]
    async fn empty_target_never_touches_host() {
        let (flow, host, _sink) = test_flow(ScriptedHost::new()).await;

        let outcome = flow.dispatch(PermissionRequest::single("  ")).await;
        assert!(outcome.is_none());

        let outcome = flow
            .dispatch(PermissionRequest::multiple(Vec::<String>::new()))
            .await;
        assert!(outcome.is_none());

        // Host was never prompted and nothing was recorded.
        assert_eq!(host.prompts.load(Ordering::SeqCst), 0);
        assert_eq!(flow.check("camera").await, PermissionStatus::NotRequested);
    }

    #[tokio::test]
    async fn denial_with_rationale_classifies_denied_once() {
        let (flow, _host, _sink) = test_flow(ScriptedHost::new().with_rationale("camera")).await;

        let outcome = flow
            .dispatch(PermissionRequest::single("camera"))
            .await
            .unwrap();

        match outcome {
            RequestOutcome::Single { status, .. } => {
                assert_eq!(status, PermissionStatus::DeniedOnce);
            }
            RequestOutcome::Multiple(_) => panic!("expected single outcome"),
        }
    }

    #[tokio::test]
    async fn check_distinguishes_never_requested_from_denied() {
        let (flow, _host, _sink) = test_flow(ScriptedHost::new()).await;

        assert_eq!(flow.check("camera").await, PermissionStatus::NotRequested);

        let outcome = flow.dispatch(PermissionRequest::single("camera")).await;
        assert!(outcome.is_some());

        assert_eq!(flow.check("camera").await, PermissionStatus::Denied);
    }

    #[tokio::test]
    async fn check_blank_name_is_not_requested() {
        let (flow, _host, _sink) = test_flow(ScriptedHost::new().will_grant("camera")).await;
        assert_eq!(flow.check("").await, PermissionStatus::NotRequested);
    }
}
