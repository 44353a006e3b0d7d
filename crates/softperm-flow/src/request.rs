//! Permission request descriptors.
//!
//! A request is an owned value built with-style and consumed by
//! [`crate::flow::PermissionFlow::dispatch`]. Each dispatch gets its own
//! descriptor; there is no shared builder state between requests.

use crate::notice::NoticeStyle;

/// Permissions a request targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// One permission; the outcome is a single status.
    Single(String),
    /// Several permissions in one prompt; the outcome is a grant report.
    Multiple(Vec<String>),
}

/// An immutable permission request descriptor.
#[derive(Debug, Clone)]
pub struct PermissionRequest {
    pub(crate) target: Target,
    pub(crate) handle_permanently_denied: bool,
    pub(crate) fallback_message: Option<String>,
    pub(crate) style: Option<NoticeStyle>,
    pub(crate) retain_style: bool,
}

impl PermissionRequest {
    /// Request a single permission.
    pub fn single(permission: impl Into<String>) -> Self {
        Self::new(Target::Single(permission.into()))
    }

    /// Request several permissions in one prompt.
    pub fn multiple<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Target::Multiple(
            permissions.into_iter().map(Into::into).collect(),
        ))
    }

    const fn new(target: Target) -> Self {
        Self {
            target,
            handle_permanently_denied: false,
            fallback_message: None,
            style: None,
            retain_style: false,
        }
    }

    /// Show the settings notice when a permission comes back permanently
    /// denied, with the configured fallback message.
    pub const fn handle_permanently_denied(mut self) -> Self {
        self.handle_permanently_denied = true;
        self
    }

    /// Like [`Self::handle_permanently_denied`], with a message override.
    pub fn handle_permanently_denied_with(mut self, message: impl Into<String>) -> Self {
        self.handle_permanently_denied = true;
        self.fallback_message = Some(message.into());
        self
    }

    /// Visual overrides for this request's notice.
    pub const fn with_notice_style(mut self, style: NoticeStyle) -> Self {
        self.style = Some(style);
        self
    }

    /// Keep this request's style for later style-less requests, until the
    /// next retained style replaces it.
    pub const fn retain_notice_style(mut self) -> Self {
        self.retain_style = true;
        self
    }

    /// Target permissions.
    pub const fn target(&self) -> &Target {
        &self.target
    }

    pub(crate) const fn is_multiple(&self) -> bool {
        matches!(self.target, Target::Multiple(_))
    }

    /// Requested names after dropping blanks. An empty result makes the
    /// dispatch a no-op.
    pub(crate) fn effective_permissions(&self) -> Vec<String> {
        let names = match &self.target {
            Target::Single(name) => std::slice::from_ref(name),
            Target::Multiple(names) => names.as_slice(),
        };
        names
            .iter()
            .map(|n| n.trim())
            .filter(|n| !n.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[cfg(test)]
#[allow(clippy::panic, clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn single_target_yields_one_name() {
        let request = PermissionRequest::single("android.permission.CAMERA");
        assert_eq!(
            request.effective_permissions(),
            vec!["android.permission.CAMERA".to_string()]
        );
        assert!(!request.is_multiple());
    }

    #[test]
    fn blank_names_are_dropped() {
        let request = PermissionRequest::single("   ");
        assert!(request.effective_permissions().is_empty());

        let request = PermissionRequest::multiple(["camera", "", "  ", "storage"]);
        assert_eq!(
            request.effective_permissions(),
            vec!["camera".to_string(), "storage".to_string()]
        );
    }

    #[test]
    fn names_are_trimmed() {
        let request = PermissionRequest::multiple([" camera ", "storage"]);
        assert_eq!(
            request.effective_permissions(),
            vec!["camera".to_string(), "storage".to_string()]
        );
    }

    #[test]
    fn handling_with_message_sets_both() {
        let request = PermissionRequest::single("camera")
            .handle_permanently_denied_with("Camera is required for scanning");
        assert!(request.handle_permanently_denied);
        assert_eq!(
            request.fallback_message.as_deref(),
            Some("Camera is required for scanning")
        );
    }

    #[test]
    fn plain_request_has_no_handling() {
        let request = PermissionRequest::single("camera");
        assert!(!request.handle_permanently_denied);
        assert!(request.fallback_message.is_none());
        assert!(request.style.is_none());
        assert!(!request.retain_style);
    }
}
