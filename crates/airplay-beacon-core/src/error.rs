//! Error types for the beacon coordinator

use thiserror::Error;

// ----------------------------------------------------------------------------
// Error Types
// ----------------------------------------------------------------------------

/// Invalid startup configuration. Always fatal before the poll loop starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AdvMin was smaller than 100 msecs (got {0})")]
    AdvMinTooSmall(u32),

    #[error("AdvMax was smaller than AdvMin ({adv_max} < {adv_min})")]
    AdvMaxBelowMin { adv_min: u32, adv_max: u32 },

    #[error("AdvMax was larger than 10240 msecs (got {0})")]
    AdvMaxTooLarge(u32),

    #[error("fast tick ({fast_ms} ms) must not be slower than slow tick ({slow_ms} ms)")]
    TickOrder { fast_ms: u128, slow_ms: u128 },

    #[error("tick periods must be non-zero")]
    ZeroTick,
}

/// Malformed state file contents
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    #[error("state record truncated: {len} bytes, need at least 6")]
    Truncated { len: usize },

    #[error("executable name is not valid UTF-8")]
    InvalidName,
}

/// Top-level coordinator error
#[derive(Error, Debug)]
pub enum BeaconError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Beacon driver unavailable: {0}")]
    DriverUnavailable(String),
}

pub type Result<T> = core::result::Result<T, BeaconError>;
