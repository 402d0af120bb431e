//! Buffered file-backed stream adapters.
//!
//! These adapters carry the full optional capability set: byte position and
//! seek are real file offsets. Writes are buffered; [`Sink::close`] flushes
//! and syncs so a closed sink is durable on disk.

use std::fs::{File, OpenOptions};
use std::io::{BufReader, BufWriter, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::error::StreamResult;
use crate::stream::io::map_eof;
use crate::stream::traits::{Sink, Source};

/// Default buffer size for file streams (64KB).
const DEFAULT_BUFFER_SIZE: usize = 64 * 1024;

/// A buffered, seekable file sink.
#[derive(Debug)]
pub struct FileSink {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl FileSink {
    /// Creates (or truncates) the file at `path` for writing.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`](crate::StreamError::Io) if the file
    /// cannot be created.
    pub fn create(path: impl AsRef<Path>) -> StreamResult<Self> {
        Self::with_capacity(path, DEFAULT_BUFFER_SIZE)
    }

    /// Creates a file sink with an explicit write-buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`](crate::StreamError::Io) if the file
    /// cannot be created.
    pub fn with_capacity(path: impl AsRef<Path>, capacity: usize) -> StreamResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file =
            OpenOptions::new().write(true).create(true).truncate(true).open(&path)?;
        debug!(path = %path.display(), capacity, "opened file sink");
        Ok(Self { path, writer: BufWriter::with_capacity(capacity, file) })
    }

    /// The path this sink writes to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Sink for FileSink {
    fn write_byte(&mut self, byte: u8) -> StreamResult<()> {
        self.writer.write_all(&[byte])?;
        Ok(())
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> StreamResult<()> {
        self.writer.write_all(bytes)?;
        Ok(())
    }

    fn flush(&mut self) -> StreamResult<()> {
        self.writer.flush()?;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        self.writer.flush()?;
        self.writer.get_ref().sync_all()?;
        Ok(())
    }

    fn position(&mut self) -> StreamResult<u64> {
        Ok(self.writer.stream_position()?)
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        self.writer.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}

impl Drop for FileSink {
    fn drop(&mut self) {
        if let Err(e) = self.writer.flush() {
            warn!(path = %self.path.display(), "failed to flush file sink on drop: {e}");
        }
    }
}

/// A buffered, seekable file source.
#[derive(Debug)]
pub struct FileSource {
    path: PathBuf,
    reader: BufReader<File>,
}

impl FileSource {
    /// Opens the file at `path` for reading.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`](crate::StreamError::Io) if the file
    /// cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> StreamResult<Self> {
        Self::with_capacity(path, DEFAULT_BUFFER_SIZE)
    }

    /// Opens a file source with an explicit read-buffer capacity.
    ///
    /// # Errors
    ///
    /// Returns [`StreamError::Io`](crate::StreamError::Io) if the file
    /// cannot be opened.
    pub fn with_capacity(path: impl AsRef<Path>, capacity: usize) -> StreamResult<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        debug!(path = %path.display(), capacity, "opened file source");
        Ok(Self { path, reader: BufReader::with_capacity(capacity, file) })
    }

    /// The path this source reads from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn read_byte(&mut self) -> StreamResult<u8> {
        let mut byte = [0u8; 1];
        self.reader.read_exact(&mut byte).map_err(map_eof)?;
        Ok(byte[0])
    }

    fn read_bytes(&mut self, buf: &mut [u8]) -> StreamResult<()> {
        self.reader.read_exact(buf).map_err(map_eof)?;
        Ok(())
    }

    fn close(&mut self) -> StreamResult<()> {
        Ok(())
    }

    fn position(&mut self) -> StreamResult<u64> {
        Ok(self.reader.stream_position()?)
    }

    fn seek(&mut self, position: u64) -> StreamResult<()> {
        self.reader.seek(SeekFrom::Start(position))?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StreamError;
    use tempfile::tempdir;

    #[test]
    fn file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("stream.bin");

        {
            let mut sink = FileSink::create(&path).unwrap();
            sink.write_bytes(&[1, 2, 3, 4]).unwrap();
            sink.close().unwrap();
        }

        let mut source = FileSource::open(&path).unwrap();
        let mut buf = [0u8; 4];
        source.read_bytes(&mut buf).unwrap();
        assert_eq!(buf, [1, 2, 3, 4]);
        assert!(matches!(source.read_byte(), Err(StreamError::EndOfStream)));
    }

    #[test]
    fn file_position_and_seek() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("seek.bin");

        let mut sink = FileSink::create(&path).unwrap();
        sink.write_bytes(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(sink.position().unwrap(), 3);
        sink.seek(1).unwrap();
        sink.write_byte(0xDD).unwrap();
        sink.close().unwrap();
        drop(sink);

        let mut source = FileSource::open(&path).unwrap();
        source.seek(1).unwrap();
        assert_eq!(source.read_byte().unwrap(), 0xDD);
        assert_eq!(source.position().unwrap(), 2);
        assert_eq!(source.read_byte().unwrap(), 0xCC);
    }
}
