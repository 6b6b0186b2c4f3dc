//! Remote recorder control messages.

use serde::{Deserialize, Serialize};

use crate::envelope::Envelope;
use crate::error::CodecError;

/// Payload of a control envelope asking the recorder to start or stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecorderCommand {
    /// `1` = start (or rotate), `2` = stop, anything else is ignored
    pub command: u8,
}

impl RecorderCommand {
    /// Reserved data type identifier of recorder commands
    pub const ID: i32 = 11;

    pub const START: u8 = 1;
    pub const STOP: u8 = 2;

    pub fn start() -> Self {
        Self {
            command: Self::START,
        }
    }

    pub fn stop() -> Self {
        Self {
            command: Self::STOP,
        }
    }

    /// Wrap the command in an envelope of type [`RecorderCommand::ID`].
    pub fn into_envelope(self) -> Result<Envelope, CodecError> {
        Ok(Envelope::new(Self::ID, bincode::serialize(&self)?))
    }

    pub fn from_envelope(envelope: &Envelope) -> Result<Self, CodecError> {
        if envelope.data_type != Self::ID {
            return Err(CodecError::UnexpectedType {
                expected: Self::ID,
                actual: envelope.data_type,
            });
        }
        Ok(bincode::deserialize(&envelope.payload)?)
    }
}

/// Interpreted recorder command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Stop,
    /// Well-formed command with an undefined value
    Unknown(u8),
    /// Command envelope whose payload could not be decoded
    Malformed,
}

impl From<RecorderCommand> for Command {
    fn from(rc: RecorderCommand) -> Self {
        match rc.command {
            RecorderCommand::START => Command::Start,
            RecorderCommand::STOP => Command::Stop,
            other => Command::Unknown(other),
        }
    }
}

impl Command {
    /// Decode a command envelope; never fails.
    pub fn from_envelope(envelope: &Envelope) -> Self {
        RecorderCommand::from_envelope(envelope)
            .map(Command::from)
            .unwrap_or(Command::Malformed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_values() {
        assert_eq!(Command::from(RecorderCommand::start()), Command::Start);
        assert_eq!(Command::from(RecorderCommand::stop()), Command::Stop);
        assert_eq!(
            Command::from(RecorderCommand { command: 7 }),
            Command::Unknown(7)
        );
        assert_eq!(
            Command::from(RecorderCommand { command: 0 }),
            Command::Unknown(0)
        );
    }

    #[test]
    fn test_envelope_carries_command() {
        let env = RecorderCommand::stop().into_envelope().unwrap();
        assert_eq!(env.data_type, RecorderCommand::ID);
        assert_eq!(Command::from_envelope(&env), Command::Stop);
    }

    #[test]
    fn test_malformed_payload() {
        let env = Envelope::new(RecorderCommand::ID, Vec::new());
        assert_eq!(Command::from_envelope(&env), Command::Malformed);
    }

    #[test]
    fn test_wrong_type_rejected() {
        let mut env = RecorderCommand::start().into_envelope().unwrap();
        env.data_type = 12;
        assert!(matches!(
            RecorderCommand::from_envelope(&env),
            Err(CodecError::UnexpectedType {
                expected: 11,
                actual: 12
            })
        ));
    }
}
