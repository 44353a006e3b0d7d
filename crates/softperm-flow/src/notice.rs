//! Settings notice model and the at-most-one-visible gate.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::host::NoticeSink;

/// ARGB color override for the notice widget.
pub type Argb = u32;

/// Visual overrides for the settings notice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoticeStyle {
    /// Background color.
    pub background: Option<Argb>,
    /// Message text color.
    pub text: Option<Argb>,
    /// Action label color.
    pub action: Option<Argb>,
}

impl NoticeStyle {
    /// Style with no overrides; the sink falls back to its own theme.
    pub const fn new() -> Self {
        Self {
            background: None,
            text: None,
            action: None,
        }
    }

    /// Override the background color.
    pub const fn with_background(mut self, color: Argb) -> Self {
        self.background = Some(color);
        self
    }

    /// Override the message text color.
    pub const fn with_text(mut self, color: Argb) -> Self {
        self.text = Some(color);
        self
    }

    /// Override the action label color.
    pub const fn with_action(mut self, color: Argb) -> Self {
        self.action = Some(color);
        self
    }
}

/// The permanently-denied notice handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsNotice {
    /// Message text.
    pub message: String,
    /// Action button label.
    pub action_label: String,
    /// Visual overrides.
    pub style: NoticeStyle,
}

/// User interaction that ended the notice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeAck {
    /// Dismissed without taking the action.
    Dismissed,
    /// The settings action was tapped.
    OpenSettings,
}

/// Gate enforcing at most one visible notice process-wide.
pub struct NoticeGate {
    sink: Arc<dyn NoticeSink>,
    visible: AtomicBool,
}

impl NoticeGate {
    /// Create a gate in front of a sink.
    pub fn new(sink: Arc<dyn NoticeSink>) -> Self {
        Self {
            sink,
            visible: AtomicBool::new(false),
        }
    }

    /// Show the notice unless one is already visible.
    ///
    /// Returns `None` when the show was suppressed; otherwise resolves with
    /// the user's interaction once the sink reports it.
    pub async fn present(&self, notice: SettingsNotice) -> Option<NoticeAck> {
        if self.visible.swap(true, Ordering::AcqRel) {
            debug!("Settings notice already visible, show suppressed");
            return None;
        }

        let ack = self.sink.show(notice).await;
        self.visible.store(false, Ordering::Release);
        Some(ack)
    }

    /// Whether a notice is currently visible.
    pub fn is_visible(&self) -> bool {
        self.visible.load(Ordering::Acquire)
    }
}
