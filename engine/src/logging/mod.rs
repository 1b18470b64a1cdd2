pub mod config;
pub mod macros;

pub use config::{init_logging, LogConfig};
pub use tracing;
pub use tracing::Level;

use once_cell::sync::Lazy;
use std::sync::OnceLock;

static LOG_CONFIG: OnceLock<LogConfig> = OnceLock::new();
static DEFAULT_CONFIG: Lazy<LogConfig> = Lazy::new(LogConfig::default);

pub fn get_log_config() -> &'static LogConfig {
    LOG_CONFIG.get().unwrap_or(&DEFAULT_CONFIG)
}

/// Install the process-wide scope config. Only the first call wins.
pub(crate) fn set_log_config(config: LogConfig) -> bool {
    LOG_CONFIG.set(config).is_ok()
}
