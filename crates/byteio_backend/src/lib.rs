//! # byteio Backend
//!
//! Byte-transport capability and backend implementations for byteio.
//!
//! This crate provides the lowest-level transport abstraction used by the
//! buffered stream. Backends are **opaque byte movers** - they do not
//! buffer, checksum or interpret the data they carry.
//!
//! ## Design Principles
//!
//! - One trait, [`Backend`], with optional capabilities defaulting to
//!   "unsupported"
//! - Forward-only transports report themselves through
//!   [`Backend::is_streamed`]
//! - An in-memory sink is just one more backend, not a special case in the
//!   buffering layer
//!
//! ## Available Backends
//!
//! - [`DynamicSink`] - Growable in-memory sink, raw or packetized
//! - [`MemoryBackend`] - In-memory source/sink for tests and fixtures
//! - [`FileBackend`] - Adapter over an operating-system file
//! - [`NullBackend`] - A backend with no capabilities
//!
//! ## Example
//!
//! ```rust
//! use byteio_backend::{Backend, DynamicSink};
//!
//! let mut sink = DynamicSink::packetized();
//! sink.write(b"hi").unwrap();
//! assert_eq!(sink.into_bytes(), vec![0, 0, 0, 2, b'h', b'i']);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod dynamic;
mod error;
mod file;
mod memory;

pub use backend::{Backend, NullBackend, SeekFlags, Whence};
pub use dynamic::{DynamicSink, MAX_DYN_SEEK, MAX_DYN_SIZE, PACKET_HEADER_SIZE};
pub use error::{BackendError, BackendResult};
pub use file::FileBackend;
pub use memory::MemoryBackend;
