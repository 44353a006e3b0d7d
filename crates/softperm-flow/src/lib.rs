//! `SoftPerm` Flow Engine
//!
//! Drives the runtime permission request lifecycle against a host platform:
//! - Request descriptors with with-style configuration
//! - Dispatch, prompting, and status classification
//! - Permanently-denied settings notice with an at-most-one-visible gate

pub mod flow;
pub mod host;
pub mod notice;
pub mod request;

pub use flow::{PermissionFlow, RequestOutcome};
pub use host::{NoticeSink, PermissionHost};
pub use notice::{Argb, NoticeAck, NoticeGate, NoticeStyle, SettingsNotice};
pub use request::{PermissionRequest, Target};
