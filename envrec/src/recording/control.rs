//! Remote start/stop handling.

use log::{debug, error, info};

use envrec_core::filename::{self, Clock};
use envrec_core::{Command, ControlAction, RecordingState};

use super::target::SharedTarget;
use crate::config::RecorderConfig;
use crate::storage::Storage;
use crate::RecorderError;

/// Drives the recording target from [`Command`]s.
///
/// A start command always computes a fresh file name, an explicit name from
/// the configuration takes precedence over the timestamp on every start.
pub struct ControlHandler<S: Storage> {
    state: RecordingState,
    name: Option<String>,
    suffix: String,
    clock: Clock,
    target: SharedTarget<S>,
}

impl<S: Storage> ControlHandler<S> {
    pub fn new(
        config: &RecorderConfig,
        target: SharedTarget<S>,
        state: RecordingState,
        clock: Clock,
    ) -> Self {
        Self {
            state,
            name: config.name.clone(),
            suffix: config.suffix.clone(),
            clock,
            target,
        }
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn handle(&mut self, command: Command) {
        match self.state.plan(command) {
            ControlAction::Open => {
                info!("Start recording");
                let name = self.next_name();
                self.state = self.opened(self.target.open(&name));
            }
            ControlAction::Rotate => {
                info!("Start recording while recording, rotating file");
                let name = self.next_name();
                self.state = self.opened(self.target.rotate(&name));
            }
            ControlAction::Close => {
                info!("Stop recording");
                self.target.close();
                self.state = RecordingState::Idle;
            }
            ControlAction::Ignore => {
                debug!("Ignoring {:?} while {}", command, self.state);
            }
        }
    }

    fn next_name(&self) -> String {
        filename::generate_with(self.name.as_deref(), &self.suffix, self.clock)
    }

    fn opened(&self, result: Result<(), RecorderError>) -> RecordingState {
        match result {
            Ok(()) => RecordingState::Recording,
            Err(e) => {
                error!("{}", e);
                RecordingState::Idle
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::testing::MemoryStorage;
    use crate::storage::OpenMode;

    fn handler(name: Option<&str>) -> (ControlHandler<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::default();
        let target = SharedTarget::new(storage.clone(), OpenMode::Truncate);
        let config = RecorderConfig {
            remote: true,
            name: name.map(String::from),
            suffix: "-s".to_string(),
            ..Default::default()
        };
        let handler =
            ControlHandler::new(&config, target, RecordingState::Idle, filename::system_clock);
        (handler, storage)
    }

    #[test]
    fn test_start_opens_named_file() {
        let (mut handler, storage) = handler(Some("x"));
        handler.handle(Command::Start);
        assert_eq!(handler.state(), RecordingState::Recording);
        assert_eq!(storage.names(), vec!["x-s".to_string()]);
    }

    #[test]
    fn test_every_start_uses_explicit_name() {
        let (mut handler, storage) = handler(Some("x"));
        handler.handle(Command::Start);
        handler.handle(Command::Start);
        assert_eq!(storage.opens(), 2);
        assert_eq!(storage.names(), vec!["x-s".to_string()]);
    }

    #[test]
    fn test_start_without_name_uses_timestamp() {
        let (mut handler, storage) = handler(None);
        handler.handle(Command::Start);
        let names = storage.names();
        assert_eq!(names.len(), 1);
        assert!(names[0].ends_with("-s.rec"));
    }

    #[test]
    fn test_stop_twice() {
        let (mut handler, storage) = handler(Some("x"));
        handler.handle(Command::Start);
        handler.handle(Command::Stop);
        assert_eq!(handler.state(), RecordingState::Idle);
        handler.handle(Command::Stop);
        assert_eq!(handler.state(), RecordingState::Idle);
        assert_eq!(storage.opens(), 1);
    }

    #[test]
    fn test_unknown_commands_are_noops() {
        let (mut handler, storage) = handler(Some("x"));
        handler.handle(Command::Unknown(42));
        handler.handle(Command::Malformed);
        assert_eq!(handler.state(), RecordingState::Idle);
        assert_eq!(storage.opens(), 0);

        handler.handle(Command::Start);
        handler.handle(Command::Unknown(0));
        assert_eq!(handler.state(), RecordingState::Recording);
        assert_eq!(storage.opens(), 1);
    }

    #[test]
    fn test_failed_start_stays_idle() {
        let (mut handler, storage) = handler(Some("x"));
        storage.fail_open(true);
        handler.handle(Command::Start);
        assert_eq!(handler.state(), RecordingState::Idle);

        storage.fail_open(false);
        handler.handle(Command::Start);
        assert_eq!(handler.state(), RecordingState::Recording);
    }
}
