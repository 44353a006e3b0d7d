//! Shared tracing/logging initialization.
//!
//! Binaries embedding the permission flow configure `tracing_subscriber`
//! from the resolved [`LoggingConfig`], with `RUST_LOG` taking precedence
//! over the configured level.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

/// Initialise the global tracing subscriber.
///
/// `targets` are the crate names filtered at the configured level when
/// `RUST_LOG` is not set (e.g. `["softperm_demo", "softperm_flow"]`).
/// `logging.log_json` switches the output to structured JSON lines instead
/// of the human-readable format.
pub fn init_tracing(logging: &LoggingConfig, targets: &[&str]) {
    let default_filter = targets
        .iter()
        .map(|target| format!("{target}={}", logging.log_level))
        .collect::<Vec<_>>()
        .join(",");
    let env_filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter),
    );
    if logging.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}
