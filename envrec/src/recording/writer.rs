//! Write path for payload envelopes.

use log::warn;

use envrec_core::{encode_record, Envelope};

use super::target::SharedTarget;
use crate::storage::Storage;

pub struct WritePath<S: Storage> {
    target: SharedTarget<S>,
}

impl<S: Storage> WritePath<S> {
    pub fn new(target: SharedTarget<S>) -> Self {
        Self { target }
    }

    /// Serialize the envelope and append it to the current file.
    ///
    /// Returns false if the envelope was dropped.
    pub fn handle(&self, envelope: Envelope) -> bool {
        match encode_record(&envelope) {
            Ok(record) => self.target.write(&record),
            Err(e) => {
                warn!(
                    "Dropping envelope of type {}: {}",
                    envelope.data_type, e
                );
                false
            }
        }
    }
}
