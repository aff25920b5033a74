//! # byteio Core
//!
//! Buffered byte streams over pluggable backends.
//!
//! This crate provides:
//! - [`BufferedStream`], a fixed-capacity buffer in front of any
//!   [`Backend`](byteio_backend::Backend), in read or write mode
//! - A seek engine that serves seeks from the buffer window, by reading
//!   forward on streamed backends, or through the backend
//! - [`ChecksumAccumulator`] folding every byte that passes the buffer
//! - In-memory streams: [`BufferedStream::from_bytes`] and the dynamic
//!   sink helpers [`BufferedStream::open_dyn_buf`] /
//!   [`BufferedStream::close_dyn_buf`]
//! - `std::io::{Read, Write, Seek}` implementations
//!
//! End of stream and backend errors are sticky state on the stream, not
//! return values of the byte primitives.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod checksum;
mod config;
mod error;
mod stream;

pub use checksum::{adler32_update, crc32_update, ChecksumAccumulator, FoldFn};
pub use config::{
    Mode, StreamConfig, WriteErrorPolicy, DEFAULT_BUFFER_SIZE, DYN_BUF_DEFAULT_SIZE,
    SEEK_LOOKAHEAD,
};
pub use error::{StreamError, StreamResult};
pub use stream::BufferedStream;
