//! Envelope recording.
//!
//! This module provides:
//! - [`SharedTarget`] - the current output file behind one lock
//! - [`ControlHandler`] - remote start/stop/rotate handling
//! - [`WritePath`] - serializing payload envelopes into the file
//! - [`FlushScheduler`] - periodic flushing to stable storage
//! - [`Recorder`] - the facade tying them to a stream of envelopes
//!
//! ## Recording Life Cycle
//!
//! ```text
//!   --remote             start            start               stop
//!  ─────────► Idle ──────────────► A ─────────────► B ────────────► Idle
//!                                  │  close A,      │  close B
//!  (no --remote) ─────────────────►┘  open B        │
//! ```
//!
//! Envelopes arriving while idle are dropped, not buffered.

pub mod control;
pub mod flush;
pub mod recorder;
pub mod target;
pub mod writer;

#[cfg(test)]
pub(crate) mod testing;

pub use control::ControlHandler;
pub use flush::FlushScheduler;
pub use recorder::Recorder;
pub use target::{RecordingStatus, RecordingTarget, SharedTarget};
pub use writer::WritePath;
