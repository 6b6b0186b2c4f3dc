//! # envrec core
//!
//! Platform-independent building blocks for the envelope recorder.
//!
//! This crate contains the envelope model, the on-disk/on-wire record codec
//! and the pure decision logic of the recorder. It has **no socket and no
//! async dependencies**; everything that touches files, clocks of a running
//! process or the network lives in the `envrec` crate.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  envrec-core (pure, no tokio/async deps)                    │
//! │  ├── envelope/  (Envelope, TimeStamp)                       │
//! │  ├── codec/     (record framing, bincode bodies)            │
//! │  ├── command/   (RecorderCommand, Command)                  │
//! │  ├── classify/  (control vs. payload)                       │
//! │  ├── control/   (Idle/Recording state machine)              │
//! │  └── filename/  (timestamped recording names)               │
//! └─────────────────────────────────────────────────────────────┘
//!                           ▲
//!              ┌────────────┴────────────┐
//!              │  envrec                 │
//!              │  (files, flush, UDP)    │
//!              └─────────────────────────┘
//! ```
//!
//! ## Example: Classifying an Envelope
//!
//! ```rust
//! use envrec_core::{classify, Classified, Command, RecorderCommand};
//!
//! let envelope = RecorderCommand::start().into_envelope().unwrap();
//! match classify(envelope, true) {
//!     Classified::Control(Command::Start) => {}
//!     other => panic!("unexpected {:?}", other),
//! }
//! ```
//!
//! ## Example: Planning a Control Action
//!
//! ```rust
//! use envrec_core::{Command, ControlAction, RecordingState};
//!
//! let state = RecordingState::initial(true);
//! assert_eq!(state, RecordingState::Idle);
//! assert_eq!(state.plan(Command::Start), ControlAction::Open);
//! assert_eq!(state.plan(Command::Stop), ControlAction::Ignore);
//! ```

pub mod classify;
pub mod codec;
pub mod command;
pub mod control;
pub mod envelope;
pub mod error;
pub mod filename;

// Re-export commonly used types
pub use classify::{classify, Classified};
pub use codec::{decode_records, encode_record, read_record, write_record, RecordReader};
pub use command::{Command, RecorderCommand};
pub use control::{ControlAction, RecordingState};
pub use envelope::{Envelope, TimeStamp};
pub use error::CodecError;
