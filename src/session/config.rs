//! # Session Configuration
//!
//! Timing knobs for a [`ProtocolSession`](super::ProtocolSession). All of
//! them have working defaults; override them for slow printers or set the
//! poll interval to zero in tests.
//!
//! ```
//! use ptouch::session::{PollConfig, SessionConfig};
//!
//! let config: SessionConfig = serde_json::from_str(r#"{"poll": {"max_attempts": 3}}"#).unwrap();
//! assert_eq!(config.poll.max_attempts, 3);
//! assert_eq!(config.poll.interval_ms, 500);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default number of status reads before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Default pause before each status read
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 500;

/// Default timeout for a single bulk transfer
pub const DEFAULT_TRANSFER_TIMEOUT_MS: u64 = 1000;

/// Bounded retry for status replies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollConfig {
    /// Reads attempted before failing with a timeout
    pub max_attempts: u32,

    /// Sleep before each read, in milliseconds. Zero disables sleeping.
    pub interval_ms: u64,
}

impl PollConfig {
    /// No sleeping between reads
    pub fn immediate(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            interval_ms: 0,
        }
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub poll: PollConfig,

    /// Timeout for one bulk transfer, in milliseconds
    pub transfer_timeout_ms: u64,
}

impl SessionConfig {
    pub fn transfer_timeout(&self) -> Duration {
        Duration::from_millis(self.transfer_timeout_ms)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll: PollConfig::default(),
            transfer_timeout_ms: DEFAULT_TRANSFER_TIMEOUT_MS,
        }
    }
}
