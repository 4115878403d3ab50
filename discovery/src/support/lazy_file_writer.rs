use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use tracing_subscriber::fmt::MakeWriter;

/// A log writer that only creates its file on the first write
///
/// A submission that logs nothing at the configured level leaves no file behind.
#[derive(Clone)]
pub struct LazyFileWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyFileWriter {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            file: Arc::new(Mutex::new(None)),
        }
    }
}

/// Writer handed out per event; shares the file handle with its `LazyFileWriter`
pub struct LazyWriter {
    path: PathBuf,
    file: Arc<Mutex<Option<File>>>,
}

impl LazyWriter {
    fn open(&self) -> io::Result<File> {
        OpenOptions::new().create(true).append(true).open(&self.path)
    }
}

impl Write for LazyWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut file_guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?;

        // Reopen if the log was deleted underneath us
        if file_guard.is_none() || !self.path.exists() {
            *file_guard = Some(self.open()?);
        }

        match file_guard.as_mut().map(|file| file.write(buf)) {
            Some(Ok(bytes)) => Ok(bytes),
            _ => {
                let mut file = self.open()?;
                let bytes = file.write(buf)?;
                *file_guard = Some(file);
                Ok(bytes)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut file_guard = self
            .file
            .lock()
            .map_err(|_| io::Error::other("Mutex poisoned"))?;

        file_guard.as_mut().map_or(Ok(()), File::flush)
    }
}

impl<'a> MakeWriter<'a> for LazyFileWriter {
    type Writer = LazyWriter;

    fn make_writer(&'a self) -> Self::Writer {
        LazyWriter {
            path: self.path.clone(),
            file: Arc::clone(&self.file),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_created_on_first_write() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("discovery.log");
        let writer = LazyFileWriter::new(path.clone());

        let mut handle = writer.make_writer();
        assert!(!path.exists());

        handle.write_all(b"first\n").expect("write");
        writer
            .make_writer()
            .write_all(b"second\n")
            .expect("write");
        handle.flush().expect("flush");

        let contents = std::fs::read_to_string(&path).expect("log exists");
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn test_deleted_file_is_recreated() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("discovery.log");
        let writer = LazyFileWriter::new(path.clone());

        writer.make_writer().write_all(b"before\n").expect("write");
        std::fs::remove_file(&path).expect("remove log");
        writer.make_writer().write_all(b"after\n").expect("write");

        let contents = std::fs::read_to_string(&path).expect("log recreated");
        assert_eq!(contents, "after\n");
    }
}
