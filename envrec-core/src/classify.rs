//! Envelope classification.
//!
//! Every incoming envelope is classified exactly once, and the result is
//! consumed by a single dispatch in the recorder. Command interpretation is
//! gated on the remote-control flag, not on the type tag alone: with remote
//! control disabled a [`RecorderCommand`] envelope is ordinary payload.

use crate::command::{Command, RecorderCommand};
use crate::envelope::Envelope;

/// Where an envelope goes next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classified {
    /// Remote control command; never written to the recording
    Control(Command),
    /// Anything to be recorded
    Payload(Envelope),
}

pub fn classify(envelope: Envelope, remote: bool) -> Classified {
    if remote && envelope.data_type == RecorderCommand::ID {
        Classified::Control(Command::from_envelope(&envelope))
    } else {
        Classified::Payload(envelope)
    }
}
