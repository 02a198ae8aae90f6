//! Helper utilities, functions, and macros shared by the replica and
//! gateway executables.

#[macro_use]
pub mod print;

mod error;

pub use error::{CoreError, DomainError};
pub use print::logger_init;

/// Default timeout for peer liveness probes.
pub const HEALTH_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(1);

/// Default timeout for forwards, snapshot pushes, and time fetches.
pub const REQ_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(2);
