//! Configuration errors

use thiserror::Error;

/// Result type alias for configuration operations
pub type Result<T> = core::result::Result<T, ConfigError>;

/// Errors raised while building a configuration
///
/// Per-sample and per-frame updates never fail; degenerate settings fall
/// back to a pass-through instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid gyro axis index {0}, expected 0 (pitch), 1 (yaw) or 2 (roll)")]
    InvalidAxis(usize),
}
