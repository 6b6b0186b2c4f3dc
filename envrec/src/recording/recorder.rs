//! Recorder - the single consumer of a session's envelopes.

use log::{debug, error, info};
use std::future::Future;
use tokio::sync::mpsc;

use envrec_core::filename::{self, Clock};
use envrec_core::{classify, Classified, Envelope, RecordingState};

use super::control::ControlHandler;
use super::flush::FlushScheduler;
use super::target::{RecordingStatus, SharedTarget};
use super::writer::WritePath;
use crate::config::RecorderConfig;
use crate::storage::Storage;
use crate::transport::Liveness;

/// Wires classification, control handling and the write path to one
/// recording target.
pub struct Recorder<S: Storage> {
    config: RecorderConfig,
    target: SharedTarget<S>,
    control: ControlHandler<S>,
    writer: WritePath<S>,
}

impl<S: Storage> Recorder<S> {
    /// Create a recorder. Unless remote controlled, the recording file is
    /// opened right away.
    pub fn new(config: RecorderConfig, storage: S) -> Self {
        Self::with_clock(config, storage, filename::system_clock)
    }

    /// [`Recorder::new`] taking generated file names from `clock`.
    pub fn with_clock(config: RecorderConfig, storage: S, clock: Clock) -> Self {
        let target = SharedTarget::new(storage, config.open_mode());

        let mut state = RecordingState::initial(config.remote);
        if state.is_recording() {
            let name = filename::generate_with(config.name.as_deref(), &config.suffix, clock);
            if let Err(e) = target.open(&name) {
                error!("{}", e);
                state = RecordingState::Idle;
            }
        } else {
            info!("Waiting for remote start command");
        }

        let control = ControlHandler::new(&config, target.clone(), state, clock);
        let writer = WritePath::new(target.clone());

        Self {
            config,
            target,
            control,
            writer,
        }
    }

    /// Process one delivered envelope.
    pub fn handle(&mut self, envelope: Envelope) {
        match classify(envelope, self.config.remote) {
            Classified::Control(command) => self.control.handle(command),
            Classified::Payload(envelope) => {
                self.writer.handle(envelope);
            }
        }
    }

    /// Flush scheduler sharing this recorder's target
    pub fn flush_scheduler(&self, liveness: Liveness) -> FlushScheduler<S> {
        FlushScheduler::new(self.target.clone(), liveness, self.config.flush_interval)
    }

    /// Consume envelopes in delivery order until the channel closes or
    /// `shutdown` completes, then close the recording.
    ///
    /// On shutdown the channel is closed to new envelopes and everything
    /// already queued is still handled.
    pub async fn run<F>(mut self, mut rx: mpsc::Receiver<Envelope>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                biased;

                _ = &mut shutdown => {
                    debug!("Recorder: shutdown requested, draining queue");
                    rx.close();
                    while let Some(envelope) = rx.recv().await {
                        self.handle(envelope);
                    }
                    break;
                }
                envelope = rx.recv() => match envelope {
                    Some(envelope) => self.handle(envelope),
                    None => {
                        info!("Envelope channel closed");
                        break;
                    }
                },
            }
        }

        self.close();
    }

    pub fn close(&self) {
        self.target.close();
    }

    /// Control state; always `Recording` for recorders that are not remote
    /// controlled and opened their file.
    pub fn state(&self) -> RecordingState {
        self.control.state()
    }

    pub fn status(&self) -> RecordingStatus {
        self.target.status()
    }
}
