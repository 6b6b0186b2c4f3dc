//! The current recording file.
//!
//! [`SharedTarget`] owns the one output file of a recorder together with its
//! name. The envelope path and the flush timer share it, and every operation
//! is a single acquisition of one mutex, so neither side can see a
//! half-closed file or a stale name. `rotate` closes and reopens under one
//! acquisition; no write can land between the two steps.
//!
//! I/O failures are not fatal: the file is marked unhealthy, further writes
//! and flushes are dropped, and the next `open`/`rotate` starts over.

use log::{debug, error, info, warn};
use serde::Serialize;
use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use envrec_core::RecordingState;

use crate::storage::{OpenMode, Storage};
use crate::RecorderError;

/// Snapshot of the recording target
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingStatus {
    pub state: RecordingState,
    /// Name of the open file (if any)
    pub filename: Option<String>,
    /// False after an I/O failure on the open file
    pub healthy: bool,
    /// Envelopes written to the open file
    pub envelope_count: u64,
    /// Bytes written to the open file
    pub size_bytes: u64,
}

struct OpenFile<W> {
    sink: W,
    name: String,
    healthy: bool,
    envelopes: u64,
    bytes: u64,
}

/// Current output of a recorder. Only reachable through [`SharedTarget`].
pub struct RecordingTarget<S: Storage> {
    storage: S,
    mode: OpenMode,
    current: Option<OpenFile<S::Sink>>,
}

impl<S: Storage> RecordingTarget<S> {
    fn open(&mut self, name: &str) -> Result<(), RecorderError> {
        self.close();

        let sink = self
            .storage
            .open(name, self.mode)
            .map_err(|source| RecorderError::Open {
                name: name.to_string(),
                source,
            })?;

        self.current = Some(OpenFile {
            sink,
            name: name.to_string(),
            healthy: true,
            envelopes: 0,
            bytes: 0,
        });
        info!("Created {}.", name);
        Ok(())
    }

    fn close(&mut self) {
        let Some(mut file) = self.current.take() else {
            return;
        };

        if file.healthy {
            if let Err(e) = self.storage.sync(&mut file.sink) {
                error!("Failed to flush {} on close: {}", file.name, e);
            }
        } else {
            warn!("Closing {} after an earlier I/O failure", file.name);
        }
        drop(file.sink);

        info!(
            "Closed {}. ({} envelopes, {} bytes)",
            file.name, file.envelopes, file.bytes
        );
    }

    fn write(&mut self, bytes: &[u8]) -> bool {
        let Some(file) = self.current.as_mut().filter(|f| f.healthy) else {
            return false;
        };

        match file.sink.write_all(bytes) {
            Ok(()) => {
                file.envelopes += 1;
                file.bytes += bytes.len() as u64;
                true
            }
            Err(e) => {
                error!("Failed to write to {}: {}", file.name, e);
                file.healthy = false;
                false
            }
        }
    }

    fn flush(&mut self) {
        let Some(file) = self.current.as_mut().filter(|f| f.healthy) else {
            return;
        };

        match self.storage.sync(&mut file.sink) {
            Ok(()) => debug!("Flushed {}", file.name),
            Err(e) => {
                error!("Failed to flush {}: {}", file.name, e);
                file.healthy = false;
            }
        }
    }

    fn status(&self) -> RecordingStatus {
        match &self.current {
            Some(file) => RecordingStatus {
                state: RecordingState::Recording,
                filename: Some(file.name.clone()),
                healthy: file.healthy,
                envelope_count: file.envelopes,
                size_bytes: file.bytes,
            },
            None => RecordingStatus {
                state: RecordingState::Idle,
                filename: None,
                healthy: true,
                envelope_count: 0,
                size_bytes: 0,
            },
        }
    }
}

/// Recording target shared between the envelope path and the flush timer.
pub struct SharedTarget<S: Storage> {
    inner: Arc<Mutex<RecordingTarget<S>>>,
}

impl<S: Storage> Clone for SharedTarget<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: Storage> SharedTarget<S> {
    /// Create a closed target.
    pub fn new(storage: S, mode: OpenMode) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RecordingTarget {
                storage,
                mode,
                current: None,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, RecordingTarget<S>> {
        // Every mutation is a single assignment, a poisoned target is still consistent.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Open `name` as the current file, closing any file that is open.
    ///
    /// On failure the target stays closed and writes are dropped until a
    /// later open succeeds.
    pub fn open(&self, name: &str) -> Result<(), RecorderError> {
        self.lock().open(name)
    }

    /// Flush and release the current file. Does nothing when closed.
    pub fn close(&self) {
        self.lock().close()
    }

    /// Close the current file and open `name` as one atomic step.
    pub fn rotate(&self, name: &str) -> Result<(), RecorderError> {
        let mut target = self.lock();
        if let Some(file) = &target.current {
            debug!("Rotating {} to {}", file.name, name);
        }
        target.open(name)
    }

    /// Append `bytes` to the current file.
    ///
    /// Returns false when the bytes were dropped because no healthy file is
    /// open.
    pub fn write(&self, bytes: &[u8]) -> bool {
        self.lock().write(bytes)
    }

    /// Force buffered bytes of the current file to stable storage.
    pub fn flush(&self) {
        self.lock().flush()
    }

    pub fn is_open(&self) -> bool {
        self.lock().current.is_some()
    }

    pub fn name(&self) -> Option<String> {
        self.lock().current.as_ref().map(|f| f.name.clone())
    }

    pub fn status(&self) -> RecordingStatus {
        self.lock().status()
    }
}
