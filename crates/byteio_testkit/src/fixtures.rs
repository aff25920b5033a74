//! Stream fixtures and test helpers.
//!
//! Provides ready-made streams over in-memory and file backends plus a
//! tracing setup for tests that want to see the stream's logs.

use byteio_backend::{DynamicSink, FileBackend, MemoryBackend};
use byteio_core::{BufferedStream, StreamConfig};
use std::path::{Path, PathBuf};
use std::sync::Once;
use tempfile::TempDir;
use tracing_subscriber::EnvFilter;

static TRACING: Once = Once::new();

/// Installs a test subscriber once per process.
///
/// The filter comes from `RUST_LOG`, defaulting to `warn`. Output goes
/// through the test writer so it is captured per test.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Opens a read stream over `data` with the given buffer capacity.
pub fn memory_reader(data: impl Into<Vec<u8>>, buffer_size: usize) -> BufferedStream<MemoryBackend> {
    BufferedStream::new(
        MemoryBackend::with_data(data.into()),
        StreamConfig::new().buffer_size(buffer_size),
    )
    .expect("Failed to open memory reader")
}

/// Opens a read stream over a forward-only copy of `data`.
pub fn streamed_reader(
    data: impl Into<Vec<u8>>,
    buffer_size: usize,
) -> BufferedStream<MemoryBackend> {
    BufferedStream::new(
        MemoryBackend::with_data(data.into()).forward_only(),
        StreamConfig::new().buffer_size(buffer_size),
    )
    .expect("Failed to open streamed reader")
}

/// Opens a write stream over a raw dynamic sink.
pub fn sink_writer(buffer_size: usize) -> BufferedStream<DynamicSink> {
    BufferedStream::new(
        DynamicSink::new(),
        StreamConfig::writing().buffer_size(buffer_size),
    )
    .expect("Failed to open sink writer")
}

/// A file in a temporary directory, removed on drop.
pub struct TestFile {
    path: PathBuf,
    _temp_dir: TempDir,
}

impl TestFile {
    /// Creates an empty temporary file path.
    pub fn new(name: &str) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let path = temp_dir.path().join(name);
        Self {
            path,
            _temp_dir: temp_dir,
        }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens a write stream creating or truncating the file.
    pub fn writer(&self, buffer_size: usize) -> BufferedStream<FileBackend> {
        let backend = FileBackend::create(&self.path).expect("Failed to create file backend");
        BufferedStream::new(backend, StreamConfig::writing().buffer_size(buffer_size))
            .expect("Failed to open file writer")
    }

    /// Opens a read stream over the file.
    pub fn reader(&self, buffer_size: usize) -> BufferedStream<FileBackend> {
        let backend = FileBackend::open(&self.path).expect("Failed to open file backend");
        BufferedStream::new(backend, StreamConfig::new().buffer_size(buffer_size))
            .expect("Failed to open file reader")
    }
}

/// Runs a test with a temporary file path.
///
/// # Example
///
/// ```rust
/// use byteio_testkit::with_temp_file;
///
/// with_temp_file(|file| {
///     let mut writer = file.writer(16);
///     writer.write_bytes(b"persisted").unwrap();
///     writer.close().unwrap();
///
///     let mut reader = file.reader(4);
///     let mut buf = [0u8; 9];
///     assert_eq!(reader.read_bytes(&mut buf), 9);
///     assert_eq!(&buf, b"persisted");
/// });
/// ```
pub fn with_temp_file<F, R>(f: F) -> R
where
    F: FnOnce(&TestFile) -> R,
{
    let file = TestFile::new("stream.bin");
    f(&file)
}

/// Drains a read stream to its end.
pub fn read_all<B: byteio_backend::Backend>(stream: &mut BufferedStream<B>) -> Vec<u8> {
    let mut out = Vec::new();
    let mut chunk = [0u8; 64];
    loop {
        let len = stream.read_bytes(&mut chunk);
        out.extend_from_slice(&chunk[..len]);
        if len < chunk.len() {
            return out;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_reader_drains() {
        init_tracing();
        let mut stream = memory_reader(b"fixture data".to_vec(), 3);
        assert_eq!(read_all(&mut stream), b"fixture data");
        assert!(stream.eof());
    }

    #[test]
    fn streamed_reader_is_forward_only() {
        let stream = streamed_reader(vec![1, 2, 3], 2);
        assert!(stream.is_forward_only());
    }

    #[test]
    fn file_roundtrip() {
        with_temp_file(|file| {
            let mut writer = file.writer(7);
            let data: Vec<u8> = (0..100).collect();
            writer.write_bytes(&data).unwrap();
            writer.close().unwrap();

            let mut reader = file.reader(16);
            assert_eq!(reader.size().unwrap(), 100);
            assert_eq!(read_all(&mut reader), data);
        });
    }

    #[test]
    fn sink_writer_collects() {
        let mut writer = sink_writer(2);
        writer.write_bytes(b"abc").unwrap();
        assert_eq!(writer.close_dyn_buf().unwrap(), b"abc");
    }
}
