//! `SoftPerm` Demo
//!
//! Drives the permission flow against a simulated platform host: scripted
//! grant and rationale decisions, a console notice sink, and a request
//! history persisted between runs.

mod sim;

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::info;

use softperm_core::config::{self, LoggingConfig, NoticeConfig};
use softperm_core::history::HistoryStore;
use softperm_core::tracing_init::init_tracing;
use softperm_flow::{NoticeStyle, PermissionFlow, PermissionRequest, RequestOutcome};

use sim::{ConsoleSink, SimHost};

#[derive(Parser, Debug)]
#[command(name = "softperm-demo")]
#[command(version, about = "SoftPerm demo - runtime permission flow against a simulated host")]
struct Args {
    /// Request history database file path
    #[arg(long, env = "SOFTPERM_HISTORY_PATH")]
    db_path: Option<PathBuf>,

    /// Log level filter (e.g. "info", "debug", "warn"); defaults to the configured level
    #[arg(long, env = "SOFTPERM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Output logs as JSON (for structured log aggregation).
    #[arg(long, env = "SOFTPERM_LOG_JSON")]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Request a single permission.
    Single {
        /// Permission name to request
        #[arg(default_value = "android.permission.CAMERA")]
        permission: String,

        /// The simulated user grants the prompt
        #[arg(long)]
        grant: bool,

        /// The denial carries the platform's ask-again hint
        #[arg(long)]
        rationale: bool,

        /// Show the settings notice when the permission is permanently denied
        #[arg(long)]
        handle: bool,

        /// Notice message override (implies --handle)
        #[arg(long)]
        message: Option<String>,

        /// Apply the demo notice style and retain it for later requests
        #[arg(long)]
        styled: bool,

        /// The simulated user taps the settings action on the notice
        #[arg(long)]
        tap_settings: bool,
    },
    /// Request several permissions behind one prompt.
    Multi {
        /// Permission names to request
        #[arg(num_args = 1.., default_values_t = vec![
            "android.permission.CAMERA".to_string(),
            "android.permission.WRITE_EXTERNAL_STORAGE".to_string(),
        ])]
        permissions: Vec<String>,

        /// Permission the simulated user grants (repeatable)
        #[arg(long = "grant")]
        grants: Vec<String>,

        /// Denial that carries the platform's ask-again hint (repeatable)
        #[arg(long = "rationale")]
        rationales: Vec<String>,

        /// Show the settings notice when any permission is permanently denied
        #[arg(long)]
        handle: bool,

        /// The simulated user taps the settings action on the notice
        #[arg(long)]
        tap_settings: bool,
    },
    /// Check the current status of a permission without prompting.
    Check {
        /// Permission name to check
        #[arg(default_value = "android.permission.CAMERA")]
        permission: String,

        /// The platform reports the permission as granted
        #[arg(long)]
        granted: bool,

        /// The platform reports the ask-again hint
        #[arg(long)]
        rationale: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let config = config::load_config()?;

    let logging = LoggingConfig {
        log_level: args
            .log_level
            .unwrap_or_else(|| config.logging.log_level.clone()),
        log_json: args.log_json || config.logging.log_json,
    };
    init_tracing(&logging, &["softperm_demo", "softperm_flow", "softperm_core"]);

    info!(version = env!("CARGO_PKG_VERSION"), "Starting softperm-demo");

    // Open the request history
    let history = if let Some(path) = &args.db_path {
        info!(path = %path.display(), "Opening request history");
        HistoryStore::open(path).await?
    } else if let Some(path) = &config.history.database_path {
        info!(path = %path.display(), "Opening request history (configured path)");
        HistoryStore::open(path).await?
    } else {
        let default_path = default_db_path()?;
        info!(path = %default_path.display(), "Opening request history (default path)");
        HistoryStore::open(&default_path).await?
    };

    match args.command {
        Command::Single {
            permission,
            grant,
            rationale,
            handle,
            message,
            styled,
            tap_settings,
        } => {
            let will_grant = scripted(grant, &permission);
            let asks_again = scripted(rationale, &permission);
            let flow = sim_flow(will_grant, asks_again, tap_settings, history, config.notice);

            let mut request = PermissionRequest::single(permission);
            request = match message {
                Some(message) => request.handle_permanently_denied_with(message),
                None if handle => request.handle_permanently_denied(),
                None => request,
            };
            if styled {
                request = request
                    .with_notice_style(demo_style())
                    .retain_notice_style();
            }

            run_dispatch(&flow, request).await?;
        }
        Command::Multi {
            permissions,
            grants,
            rationales,
            handle,
            tap_settings,
        } => {
            let flow = sim_flow(
                grants.into_iter().collect(),
                rationales.into_iter().collect(),
                tap_settings,
                history,
                config.notice,
            );

            let mut request = PermissionRequest::multiple(permissions);
            if handle {
                request = request.handle_permanently_denied();
            }

            run_dispatch(&flow, request).await?;
        }
        Command::Check {
            permission,
            granted,
            rationale,
        } => {
            let will_grant = scripted(granted, &permission);
            let asks_again = scripted(rationale, &permission);
            let flow = sim_flow(will_grant, asks_again, false, history, config.notice);

            let status = flow.check(&permission).await;
            info!(permission = %permission, status = %status, "Checked permission");
            emit(&serde_json::json!({ "permission": permission, "status": status }))?;
        }
    }

    Ok(())
}

/// Dispatch a request and print the classified outcome.
async fn run_dispatch(flow: &PermissionFlow, request: PermissionRequest) -> anyhow::Result<()> {
    match flow.dispatch(request).await {
        Some(RequestOutcome::Single { permission, status }) => {
            info!(permission = %permission, status = %status, "Request resolved");
            emit(&serde_json::json!({ "permission": permission, "status": status }))?;
        }
        Some(RequestOutcome::Multiple(report)) => {
            info!(all_granted = report.all_granted, "Request resolved");
            emit(&report)?;
        }
        None => info!("Nothing was requested"),
    }

    settle_notices(flow).await;
    Ok(())
}

/// Wait out the detached notice task so the process does not exit while the
/// simulated user is still looking at the notice.
async fn settle_notices(flow: &PermissionFlow) {
    tokio::time::sleep(Duration::from_millis(50)).await;
    while flow.notice_visible() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Wire the flow engine to a scripted host and a console notice sink.
fn sim_flow(
    will_grant: HashSet<String>,
    rationale: HashSet<String>,
    tap_settings: bool,
    history: HistoryStore,
    notice: NoticeConfig,
) -> PermissionFlow {
    let host = Arc::new(SimHost::new(will_grant, rationale));
    let sink = Arc::new(ConsoleSink::new(tap_settings));
    PermissionFlow::new(host, sink, history, notice)
}

/// Single-permission script set: `{permission}` when the flag is set.
fn scripted(flag: bool, permission: &str) -> HashSet<String> {
    if flag {
        HashSet::from([permission.to_string()])
    } else {
        HashSet::new()
    }
}

/// Notice style applied by --styled: dark background with an amber action.
const fn demo_style() -> NoticeStyle {
    NoticeStyle::new()
        .with_background(0xFF26_3238)
        .with_text(0xFFFF_FFFF)
        .with_action(0xFFFF_C107)
}

/// Print a JSON document to stdout for scripting against the demo.
#[allow(clippy::print_stdout)]
fn emit<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Default history path: ~/.softperm/history.db
fn default_db_path() -> anyhow::Result<PathBuf> {
    let home =
        dirs::home_dir().ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
    Ok(home.join(".softperm").join("history.db"))
}
