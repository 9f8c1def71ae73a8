use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::serializer::SerializationError;

#[derive(Error, Debug)]
pub enum TransportError {
    #[error("Serialization failed: {0}")]
    Serialization(#[from] SerializationError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Sends serialized frames to a destination.
pub trait Sender: Send {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError>;

    fn flush(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// Writes each frame followed by a newline.
pub struct LineSender<W: Write> {
    writer: W,
}

/// Sends frames to standard output.
pub type StdioSender = LineSender<io::Stdout>;

/// Appends frames to a file.
pub type FileSender = LineSender<BufWriter<File>>;

impl<W: Write> LineSender<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl LineSender<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl LineSender<BufWriter<File>> {
    pub fn append_to(path: impl AsRef<Path>) -> Result<Self, TransportError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::new(BufWriter::new(file)))
    }
}

impl<W: Write + Send> Sender for LineSender<W> {
    fn send(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.writer.write_all(data)?;
        self.writer.write_all(b"\n")?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), TransportError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Discards everything.
#[derive(Default)]
pub struct NullSender;

impl Sender for NullSender {
    fn send(&mut self, _data: &[u8]) -> Result<(), TransportError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn line_sender_terminates_each_frame() {
        let mut sender = LineSender::new(Vec::new());
        sender.send(b"first").unwrap();
        sender.send(b"second").unwrap();
        assert_eq!(sender.into_inner(), b"first\nsecond\n".to_vec());
    }

    #[test]
    fn file_sender_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frames.jsonl");

        let mut sender = FileSender::append_to(&path).unwrap();
        sender.send(b"a").unwrap();
        sender.flush().unwrap();
        drop(sender);

        let mut sender = FileSender::append_to(&path).unwrap();
        sender.send(b"b").unwrap();
        sender.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }
}
