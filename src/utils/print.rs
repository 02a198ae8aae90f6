//! Logging setup and replica-prefixed logging macros.
//!
//! Every line is tagged with the emitting replica's ID so that
//! interleaved multi-replica logs on a single terminal stay readable.

use std::sync::atomic::{AtomicU16, Ordering};

/// Process-wide node ID used to prefix log lines. Set once at startup by
/// [`logger_init`]; reads before that return 0 (the gateway, which has no
/// node ID, never calls these macros with a meaningful value).
static ME: AtomicU16 = AtomicU16::new(0);

/// Initializes `env_logger` and records this process's node ID for the
/// `pf_*!` macros to pick up.
pub fn logger_init(id: u16) {
    ME.store(id, Ordering::Relaxed);
    let _ = env_logger::try_init();
}

#[doc(hidden)]
pub fn me() -> u16 {
    ME.load(Ordering::Relaxed)
}

/// Logs at `trace` level, prefixed with this replica's ID.
#[macro_export]
macro_rules! pf_trace {
    ($($arg:tt)*) => {
        log::trace!("<{}> {}", $crate::utils::print::me(), format!($($arg)*))
    };
}

/// Logs at `debug` level, prefixed with this replica's ID.
#[macro_export]
macro_rules! pf_debug {
    ($($arg:tt)*) => {
        log::debug!("<{}> {}", $crate::utils::print::me(), format!($($arg)*))
    };
}

/// Logs at `info` level, prefixed with this replica's ID.
#[macro_export]
macro_rules! pf_info {
    ($($arg:tt)*) => {
        log::info!("<{}> {}", $crate::utils::print::me(), format!($($arg)*))
    };
}

/// Logs at `warn` level, prefixed with this replica's ID.
#[macro_export]
macro_rules! pf_warn {
    ($($arg:tt)*) => {
        log::warn!("<{}> {}", $crate::utils::print::me(), format!($($arg)*))
    };
}

/// Logs at `error` level, prefixed with this replica's ID.
#[macro_export]
macro_rules! pf_error {
    ($($arg:tt)*) => {
        log::error!("<{}> {}", $crate::utils::print::me(), format!($($arg)*))
    };
}
