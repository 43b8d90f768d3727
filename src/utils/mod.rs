//! Logging and environment helpers

pub mod env;
pub mod logging;

pub use env::{env_bool_opt, env_opt, parse_bool};
#[cfg(feature = "json-logging")]
pub use logging::init_json_logging;
pub use logging::{effective_filter, init_logging, init_logging_from_config};
