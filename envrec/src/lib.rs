//! # envrec
//!
//! Recorder for a stream of envelopes published on a session.
//!
//! The recorder subscribes to every envelope of a session and appends it to
//! a recording file. Optionally it listens for remote
//! [`RecorderCommand`](envrec_core::RecorderCommand)s that start, stop and
//! rotate the recording file.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                         envrec                             │
//! │  ┌───────────────┐   mpsc    ┌──────────────────────────┐  │
//! │  │ UdpSession    │ ────────► │ Recorder                 │  │
//! │  │ (transport)   │ envelopes │  classify ─► control     │  │
//! │  └───────┬───────┘           │          └─► write path  │  │
//! │          │ Liveness          └────────────┬─────────────┘  │
//! │          ▼                                ▼                │
//! │  ┌───────────────┐   flush   ┌──────────────────────────┐  │
//! │  │ FlushScheduler│ ────────► │ SharedTarget (Mutex)     │  │
//! │  └───────────────┘           │  current file + name     │  │
//! │                              └──────────────────────────┘  │
//! └────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both the envelope path and the flush timer go through the single lock in
//! [`recording::SharedTarget`], so a rotation is never observed half done.
//!
//! ## Command-Line Interface
//!
//! See [`Cli`] for all options:
//!
//! - `--cid` - session to record (required)
//! - `--rec` - recording name; default `YYYY-MM-DD_HHMMSS.rec`
//! - `--recsuffix` - suffix added to the recording name
//! - `--remote` - wait for start/stop commands
//! - `--append` - append to existing files instead of overwriting

use clap::Parser;
use miette::Diagnostic;
use thiserror::Error;

pub mod config;
pub mod recording;
pub mod storage;
pub mod transport;

pub use config::RecorderConfig;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Clone, Debug)]
#[command(version, about = "Record envelopes from a given session")]
pub struct Cli {
    #[clap(flatten)]
    pub verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::InfoLevel>,

    /// CID of the session to receive envelopes for recording
    #[arg(long)]
    pub cid: u16,

    /// Name of the recording file; default: YYYY-MM-DD_HHMMSS.rec
    #[arg(long)]
    pub rec: Option<String>,

    /// Additional suffix to add to the recording file name
    #[arg(long, default_value = "")]
    pub recsuffix: String,

    /// Listen for RecorderCommand envelopes to start/stop recording
    #[arg(long, default_value_t = false)]
    pub remote: bool,

    /// Append to existing files instead of overwriting
    #[arg(long, default_value_t = false)]
    pub append: bool,

    /// Seconds between flushes of the recording file
    #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u64).range(1..))]
    pub flush_interval: u64,

    /// Number of envelopes buffered between the session and the recorder
    #[arg(long, default_value_t = 1024, value_parser = clap::value_parser!(u64).range(1..))]
    pub queue: u64,
}

#[derive(Error, Debug, Diagnostic)]
pub enum RecorderError {
    #[error("I/O operation failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("Cannot open recording '{name}': {source}")]
    Open {
        name: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid CID {0}")]
    #[diagnostic(help("the CID selects multicast group 225.0.0.<cid>, use a value from 1 to 254"))]
    InvalidCid(u16),
}
