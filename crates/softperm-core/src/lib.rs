//! `SoftPerm` Core Library
//!
//! Shared functionality for `SoftPerm` components:
//! - Permission status model and classification precedence
//! - Request history persistence
//! - Configuration resolution and hierarchy
//! - Common error types

pub mod config;
pub mod error;
pub mod history;
pub mod status;
pub mod tracing_init;

pub use config::Config;
pub use error::{Error, Result};
pub use status::{GrantReport, PermissionStatus};
