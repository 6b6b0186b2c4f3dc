//! Recorder configuration, fixed at startup.

use std::time::Duration;

use crate::storage::OpenMode;
use crate::Cli;

/// Flush period used when none is configured
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(5);

/// Envelope queue size used when none is configured
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecorderConfig {
    /// Interpret RecorderCommand envelopes instead of recording them
    pub remote: bool,
    /// Append to existing files instead of truncating them
    pub append: bool,
    /// Explicit recording name; a timestamped name is generated when absent
    pub name: Option<String>,
    pub suffix: String,
    pub flush_interval: Duration,
    pub queue_capacity: usize,
}

impl RecorderConfig {
    pub fn open_mode(&self) -> OpenMode {
        if self.append {
            OpenMode::Append
        } else {
            OpenMode::Truncate
        }
    }
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            remote: false,
            append: false,
            name: None,
            suffix: String::new(),
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            queue_capacity: DEFAULT_QUEUE_CAPACITY,
        }
    }
}

impl From<&Cli> for RecorderConfig {
    fn from(args: &Cli) -> Self {
        Self {
            remote: args.remote,
            append: args.append,
            name: args.rec.clone().filter(|name| !name.is_empty()),
            suffix: args.recsuffix.clone(),
            flush_interval: Duration::from_secs(args.flush_interval),
            queue_capacity: args.queue as usize,
        }
    }
}
