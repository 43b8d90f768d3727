//! Logging initialization
//!
//! Sets up a `tracing-subscriber` registry for binaries embedding the
//! resolver (the `modweave-resolve` tool among them). The library itself only
//! emits `tracing` events and never installs a subscriber.
//!
//! Filter precedence: `RUST_LOG`, then the configured filter, then `info`.
//!
//! ```rust
//! use modweave::utils::init_logging;
//!
//! init_logging(Some("modweave=debug"));
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Filter used when neither `RUST_LOG` nor a configured filter is present
pub const DEFAULT_FILTER: &str = "info";

/// Pick the filter directive: `RUST_LOG` wins over `configured`
pub fn effective_filter(rust_log: Option<&str>, configured: Option<&str>) -> String {
    rust_log
        .or(configured)
        .unwrap_or(DEFAULT_FILTER)
        .to_string()
}

fn env_filter(configured: Option<&str>) -> EnvFilter {
    let rust_log = std::env::var("RUST_LOG").ok();
    EnvFilter::new(effective_filter(rust_log.as_deref(), configured))
}

/// Initialize human-readable logging to stderr.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_logging(filter: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_thread_ids(false)
                .with_ansi(std::env::var("NO_COLOR").is_err()),
        )
        .with(env_filter(filter))
        .try_init()
        .is_ok()
}

/// Initialize JSON logging for log aggregation
#[cfg(feature = "json-logging")]
pub fn init_json_logging(filter: Option<&str>) -> bool {
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_current_span(true)
                .with_span_list(true),
        )
        .with(env_filter(filter))
        .try_init()
        .is_ok()
}

/// Initialize logging from the `logging` section of a `BootstrapConfig`
pub fn init_logging_from_config(config: Option<&LoggingConfig>) -> bool {
    let filter = config.and_then(|c| c.filter.as_deref());

    if config.map(|c| c.json_format).unwrap_or(false) {
        #[cfg(feature = "json-logging")]
        {
            return init_json_logging(filter);
        }
        #[cfg(not(feature = "json-logging"))]
        {
            tracing::debug!("json-logging feature disabled, using text output");
        }
    }

    init_logging(filter)
}
