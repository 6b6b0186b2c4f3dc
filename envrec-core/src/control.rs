//! Recording state machine.
//!
//! Pure transitions only: the runtime crate performs the file operations
//! and then records the resulting state.
//!
//! ```text
//!            Start / Open              Start / Rotate
//!   ┌──────┐ ────────────────► ┌───────────┐ ──┐
//!   │ Idle │                   │ Recording │   │
//!   └──────┘ ◄──────────────── └───────────┘ ◄─┘
//!            Stop / Close
//! ```

use serde::{Deserialize, Serialize};

use crate::command::Command;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecordingState {
    /// No output file is open; envelopes are dropped
    Idle,
    /// An output file is open and receiving envelopes
    Recording,
}

/// File operation required by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    /// Open a new file
    Open,
    /// Close the current file and open a new one
    Rotate,
    /// Close the current file
    Close,
    Ignore,
}

impl RecordingState {
    /// Remote-controlled recorders wait for a start command; others record
    /// from startup.
    pub fn initial(remote: bool) -> Self {
        if remote {
            RecordingState::Idle
        } else {
            RecordingState::Recording
        }
    }

    pub fn is_recording(&self) -> bool {
        matches!(self, RecordingState::Recording)
    }

    pub fn plan(self, command: Command) -> ControlAction {
        match (self, command) {
            (RecordingState::Idle, Command::Start) => ControlAction::Open,
            (RecordingState::Recording, Command::Start) => ControlAction::Rotate,
            (RecordingState::Recording, Command::Stop) => ControlAction::Close,
            (RecordingState::Idle, Command::Stop)
            | (_, Command::Unknown(_))
            | (_, Command::Malformed) => ControlAction::Ignore,
        }
    }
}

impl std::fmt::Display for RecordingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Recording => write!(f, "recording"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        assert_eq!(RecordingState::initial(true), RecordingState::Idle);
        assert_eq!(RecordingState::initial(false), RecordingState::Recording);
    }

    #[test]
    fn test_transitions() {
        use ControlAction::*;
        use RecordingState::*;

        assert_eq!(Idle.plan(Command::Start), Open);
        assert_eq!(Recording.plan(Command::Start), Rotate);
        assert_eq!(Recording.plan(Command::Stop), Close);
        assert_eq!(Idle.plan(Command::Stop), Ignore);
    }

    #[test]
    fn test_unknown_commands_ignored_in_every_state() {
        for state in [RecordingState::Idle, RecordingState::Recording] {
            assert_eq!(state.plan(Command::Unknown(3)), ControlAction::Ignore);
            assert_eq!(state.plan(Command::Malformed), ControlAction::Ignore);
        }
    }
}
