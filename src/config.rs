//! Service configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for a [`WatchService`](crate::WatchService).
///
/// Every field can be overridden per service; the defaults are production
/// values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchConfig {
    /// Maximum number of sources a single session may watch.
    pub max_sources: usize,

    /// Maximum keyword length in bytes. Longer keywords are rejected, not
    /// truncated.
    pub max_keyword_len: usize,

    /// Maximum bytes read from one source per poll iteration. Also bounds how
    /// long a worker can stay busy between stop checks.
    pub chunk_size: usize,

    /// How long a worker waits between poll iterations. A stop request wakes
    /// the worker before the interval elapses.
    pub poll_interval: Duration,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            max_sources: 5,
            max_keyword_len: 128,
            chunk_size: 4096,
            poll_interval: Duration::from_secs(2),
        }
    }
}
