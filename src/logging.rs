//! Logging setup for the provider.
//!
//! Everything is written to **stderr**; stdout belongs to the plugin host.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: full `tracing` filter (e.g. `leaseweb_provider=debug`). Wins
//!   when set.
//! - `TF_LOG`: Terraform's log level (`TRACE`, `DEBUG`, `INFO`, `WARN`,
//!   `ERROR`). `JSON` is read as `TRACE`.
//!
//! ```bash
//! TF_LOG=DEBUG terraform apply
//! RUST_LOG=leaseweb_provider::facade=trace terraform apply
//! ```

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Environment variable carrying Terraform's log level.
pub const TF_LOG: &str = "TF_LOG";

/// The `tracing` level for a `TF_LOG` value, if it names one.
pub fn level_from_tf_log(value: &str) -> Option<&'static str> {
    match value.trim().to_ascii_uppercase().as_str() {
        "TRACE" | "JSON" => Some("trace"),
        "DEBUG" => Some("debug"),
        "INFO" => Some("info"),
        "WARN" => Some("warn"),
        "ERROR" => Some("error"),
        _ => None,
    }
}

fn filter(default_level: &str) -> EnvFilter {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return filter;
    }
    let tf_log = std::env::var(TF_LOG).ok();
    match tf_log.as_deref().and_then(level_from_tf_log) {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::new(default_level),
    }
}

fn subscriber(default_level: &str) -> impl tracing::Subscriber + Send + Sync {
    tracing_subscriber::registry().with(filter(default_level)).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_thread_ids(false)
            .with_file(false)
            .with_line_number(false),
    )
}

/// Install the global subscriber at `info` unless the environment says
/// otherwise.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging() {
    init_logging_with_default("info");
}

/// Like [`init_logging`] with another fallback level.
///
/// # Panics
///
/// Panics if a global subscriber has already been set.
pub fn init_logging_with_default(default_level: &str) {
    subscriber(default_level).init();
}

/// Install the global subscriber unless one is already set. Returns whether
/// this call installed it.
pub fn try_init_logging() -> bool {
    subscriber("info").try_init().is_ok()
}
