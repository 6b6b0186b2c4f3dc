//! Storage backends for recording files.
//!
//! The file handle manager only needs to open a named sink and later force
//! it to stable storage. [`FsStorage`] does that with buffered files on the
//! local filesystem; tests plug in in-memory sinks.

use log::debug;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// How an existing file is treated when opened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenMode {
    /// Start the file from scratch
    #[default]
    Truncate,
    /// Keep existing content and add to the end
    Append,
}

/// Where recordings are written.
pub trait Storage: Send + Sync + 'static {
    type Sink: Write + Send + 'static;

    /// Create or open the named recording.
    fn open(&self, name: &str, mode: OpenMode) -> io::Result<Self::Sink>;

    /// Push buffered bytes of `sink` to stable storage.
    fn sync(&self, sink: &mut Self::Sink) -> io::Result<()> {
        sink.flush()
    }
}

/// Recording files on the local filesystem.
///
/// Relative names are resolved against the base directory, which defaults
/// to the working directory of the process.
#[derive(Debug, Clone, Default)]
pub struct FsStorage {
    base_dir: Option<PathBuf>,
}

impl FsStorage {
    pub fn new() -> Self {
        Self { base_dir: None }
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self {
            base_dir: Some(base_dir),
        }
    }

    /// Path a recording name resolves to
    pub fn path(&self, name: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(name),
            None => PathBuf::from(name),
        }
    }
}

impl Storage for FsStorage {
    type Sink = BufWriter<File>;

    fn open(&self, name: &str, mode: OpenMode) -> io::Result<Self::Sink> {
        let path = self.path(name);
        ensure_parent(&path)?;

        let mut options = OpenOptions::new();
        match mode {
            OpenMode::Truncate => options.write(true).create(true).truncate(true),
            OpenMode::Append => options.append(true).create(true),
        };
        let file = options.open(&path)?;
        debug!("Opened {} ({:?})", path.display(), mode);

        Ok(BufWriter::new(file))
    }

    fn sync(&self, sink: &mut Self::Sink) -> io::Result<()> {
        sink.flush()?;
        sink.get_ref().sync_data()
    }
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_truncate_and_append() {
        let temp = TempDir::new().unwrap();
        let storage = FsStorage::with_base_dir(temp.path().to_path_buf());

        let mut sink = storage.open("a.rec", OpenMode::Truncate).unwrap();
        sink.write_all(b"first").unwrap();
        storage.sync(&mut sink).unwrap();
        drop(sink);

        let mut sink = storage.open("a.rec", OpenMode::Append).unwrap();
        sink.write_all(b"+second").unwrap();
        storage.sync(&mut sink).unwrap();
        drop(sink);
        assert_eq!(fs::read(storage.path("a.rec")).unwrap(), b"first+second");

        let mut sink = storage.open("a.rec", OpenMode::Truncate).unwrap();
        sink.write_all(b"third").unwrap();
        storage.sync(&mut sink).unwrap();
        drop(sink);
        assert_eq!(fs::read(storage.path("a.rec")).unwrap(), b"third");
    }

    #[test]
    fn test_creates_parent_directories() {
        let temp = TempDir::new().unwrap();
        let storage = FsStorage::with_base_dir(temp.path().to_path_buf());

        storage.open("nested/dir/b.rec", OpenMode::Truncate).unwrap();
        assert!(temp.path().join("nested/dir/b.rec").exists());
    }

    #[test]
    fn test_open_failure_is_reported() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blocker"), b"").unwrap();
        let storage = FsStorage::with_base_dir(temp.path().to_path_buf());

        // A regular file cannot act as a directory
        assert!(storage.open("blocker/c.rec", OpenMode::Truncate).is_err());
    }
}
