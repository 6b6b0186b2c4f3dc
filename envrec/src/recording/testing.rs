//! In-memory storage for tests.
//!
//! Bytes written to a [`MemorySink`] become visible in the storage only when
//! the sink is flushed, which mirrors a buffered file.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::storage::{OpenMode, Storage};

#[derive(Clone, Default)]
pub(crate) struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    order: Arc<Mutex<Vec<String>>>,
    fail_open: Arc<AtomicBool>,
    fail_write: Arc<AtomicBool>,
    opens: Arc<AtomicUsize>,
}

pub(crate) struct MemorySink {
    name: String,
    files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    fail_write: Arc<AtomicBool>,
    pending: Vec<u8>,
}

impl MemoryStorage {
    pub fn fail_open(&self, fail: bool) {
        self.fail_open.store(fail, Ordering::SeqCst);
    }

    pub fn fail_write(&self, fail: bool) {
        self.fail_write.store(fail, Ordering::SeqCst);
    }

    pub fn opens(&self) -> usize {
        self.opens.load(Ordering::SeqCst)
    }

    /// Flushed content of a file (empty if it was never created)
    pub fn contents(&self, name: &str) -> Vec<u8> {
        self.files
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    /// Names of all files in the order they were first created
    pub fn names(&self) -> Vec<String> {
        self.order.lock().unwrap().clone()
    }
}

impl Storage for MemoryStorage {
    type Sink = MemorySink;

    fn open(&self, name: &str, mode: OpenMode) -> io::Result<MemorySink> {
        if self.fail_open.load(Ordering::SeqCst) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "open refused",
            ));
        }
        self.opens.fetch_add(1, Ordering::SeqCst);

        let mut files = self.files.lock().unwrap();
        if !files.contains_key(name) {
            self.order.lock().unwrap().push(name.to_string());
        }
        match mode {
            OpenMode::Truncate => {
                files.insert(name.to_string(), Vec::new());
            }
            OpenMode::Append => {
                files.entry(name.to_string()).or_default();
            }
        }

        Ok(MemorySink {
            name: name.to_string(),
            files: self.files.clone(),
            fail_write: self.fail_write.clone(),
            pending: Vec::new(),
        })
    }
}

impl Write for MemorySink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.fail_write.load(Ordering::SeqCst) {
            return Err(io::Error::new(io::ErrorKind::Other, "disk full"));
        }
        self.pending.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        let pending = std::mem::take(&mut self.pending);
        self.files
            .lock()
            .unwrap()
            .entry(self.name.clone())
            .or_default()
            .extend(pending);
        Ok(())
    }
}
