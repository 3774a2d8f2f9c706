//! Logger setup plus logging macros gated on a per-module `ENABLE_LOGS` flag.
//!
//! A module opts in by declaring the flag and importing the macros from the
//! crate root:
//!
//! ```text
//! const ENABLE_LOGS: bool = true;
//! use crate::{log_info, log_warn};
//!
//! log_info!("sampled {} frames", count);
//! ```

use log::LevelFilter;

/// Set to `1` or `true` to log at debug level when `RUST_LOG` is unset.
pub const DEBUG_ENV_VAR: &str = "MOOD_BOOSTER_DEBUG";

fn debug_requested() -> bool {
    std::env::var(DEBUG_ENV_VAR)
        .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// Install the `env_logger` backend. `RUST_LOG` wins when set; otherwise the
/// level is info, or debug under `MOOD_BOOSTER_DEBUG`. Calling this again is a
/// no-op.
pub fn init_logging() {
    let default_level = if debug_requested() {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };

    let mut builder = env_logger::Builder::new();
    builder.filter_level(default_level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }

    if builder.try_init().is_ok() {
        log::info!("Mood Booster logging initialised at {default_level}");
    }
}

/// `log::info!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::info!($($arg)*);
        }
    };
}

/// `log::warn!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::warn!($($arg)*);
        }
    };
}

/// `log::error!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::error!($($arg)*);
        }
    };
}

/// `log::debug!` when the calling module's `ENABLE_LOGS` is true.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        if ENABLE_LOGS {
            log::debug!($($arg)*);
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENABLE_LOGS: bool = true;

    #[test]
    fn test_init_is_idempotent() {
        init_logging();
        init_logging();
        log_debug!("logger installed at {}", log::max_level());
    }
}
