//! Model-checked stream harness.
//!
//! [`StreamHarness`] applies every operation both to a real write stream
//! and to a plain vector model, and checks they agree.

use crate::generators::StreamOp;
use byteio_backend::{DynamicSink, Whence};
use byteio_core::{BufferedStream, StreamConfig};

/// A write stream paired with the bytes it should produce.
pub struct StreamHarness {
    /// The stream under test.
    pub stream: BufferedStream<DynamicSink>,
    model: Vec<u8>,
    cursor: usize,
}

impl StreamHarness {
    /// Creates a harness over a raw dynamic sink with the given buffer.
    pub fn new(buffer_size: usize) -> Self {
        let stream = BufferedStream::new(
            DynamicSink::new(),
            StreamConfig::writing().buffer_size(buffer_size),
        )
        .expect("Failed to open harness stream");
        Self {
            stream,
            model: Vec::new(),
            cursor: 0,
        }
    }

    /// Applies one operation to stream and model.
    pub fn apply(&mut self, op: &StreamOp) {
        match op {
            StreamOp::Write(bytes) => {
                self.stream.write_bytes(bytes).expect("Failed to write");
                let end = self.cursor + bytes.len();
                if end > self.model.len() {
                    self.model.resize(end, 0);
                }
                self.model[self.cursor..end].copy_from_slice(bytes);
                self.cursor = end;
            }
            StreamOp::Seek(offset) => {
                let target = (*offset as usize).min(self.model.len());
                let reached = self
                    .stream
                    .seek(target as i64, Whence::Start)
                    .expect("Failed to seek");
                assert_eq!(reached, target as u64);
                self.cursor = target;
            }
            StreamOp::Flush => self.stream.flush().expect("Failed to flush"),
        }
        assert_eq!(
            self.stream.tell(),
            self.cursor as u64,
            "cursor diverged after {op:?}"
        );
    }

    /// Applies a sequence of operations.
    pub fn run(&mut self, ops: &[StreamOp]) {
        for op in ops {
            self.apply(op);
        }
    }

    /// Returns the bytes the stream should hold.
    pub fn model(&self) -> &[u8] {
        &self.model
    }

    /// Closes the stream and asserts its content equals the model.
    pub fn verify(self) -> Vec<u8> {
        let bytes = self.stream.close_dyn_buf().expect("Failed to close");
        assert_eq!(bytes, self.model, "stream content diverged from model");
        bytes
    }
}

/// Parses an operation sequence from raw fuzzer input.
///
/// Each operation starts with a selector byte; writes take a length byte
/// and that many payload bytes, seeks take one offset byte.
pub fn parse_ops(data: &[u8]) -> Vec<StreamOp> {
    let mut ops = Vec::new();
    let mut offset = 0;

    while offset < data.len() {
        let selector = data[offset];
        offset += 1;

        let op = match selector % 3 {
            0 => {
                let Some(&len) = data.get(offset) else { break };
                offset += 1;
                let end = offset + usize::from(len);
                let Some(payload) = data.get(offset..end) else {
                    break;
                };
                offset = end;
                StreamOp::Write(payload.to_vec())
            }
            1 => {
                let Some(&target) = data.get(offset) else { break };
                offset += 1;
                StreamOp::Seek(u64::from(target))
            }
            _ => StreamOp::Flush,
        };
        ops.push(op);
    }

    ops
}

/// Runs fuzzer input through a harness, panicking on any divergence.
pub fn fuzz_stream_ops(data: &[u8]) {
    let Some((&buffer, rest)) = data.split_first() else {
        return;
    };
    let mut harness = StreamHarness::new(usize::from(buffer % 32) + 1);
    harness.run(&parse_ops(rest));
    harness.verify();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn harness_tracks_overwrite() {
        let mut harness = StreamHarness::new(4);
        harness.run(&[
            StreamOp::Write(b"ABCDEFGH".to_vec()),
            StreamOp::Seek(2),
            StreamOp::Write(b"xy".to_vec()),
            StreamOp::Flush,
            StreamOp::Seek(7),
            StreamOp::Write(b"!!".to_vec()),
        ]);
        assert_eq!(harness.verify(), b"ABxyEFG!!");
    }

    #[test]
    fn parse_ops_stops_on_truncated_input() {
        let ops = parse_ops(&[0, 3, b'a', b'b', b'c', 1, 9, 2, 0, 5, b'x']);
        assert_eq!(ops.len(), 3);
        assert!(matches!(&ops[0], StreamOp::Write(bytes) if bytes == b"abc"));
        assert!(matches!(ops[1], StreamOp::Seek(9)));
        assert!(matches!(ops[2], StreamOp::Flush));
    }

    #[test]
    fn fuzz_accepts_arbitrary_input() {
        fuzz_stream_ops(&[]);
        fuzz_stream_ops(&[3, 0, 2, 1, 2, 1, 0, 2, 0, 1, 7]);
        fuzz_stream_ops(&[0, 0, 5, 1, 2, 3, 4, 5, 1, 1, 0, 1, 9]);
    }
}
