//! # byteio Testkit
//!
//! Test utilities for byteio.
//!
//! This crate provides:
//! - Stream fixtures over memory, sink and file backends
//! - Property-based test generators using proptest
//! - A fault-injecting, call-counting backend wrapper
//! - A model-checked write harness and fuzz entry point
//! - Codec and checksum test vectors
//!
//! ## Usage
//!
//! ```rust
//! use byteio_testkit::prelude::*;
//!
//! let mut stream = memory_reader(b"abc".to_vec(), 2);
//! assert_eq!(read_all(&mut stream), b"abc");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod faulty;
pub mod fixtures;
pub mod generators;
pub mod harness;
pub mod vectors;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::faulty::*;
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::harness::*;
    pub use crate::vectors::*;
}

pub use faulty::*;
pub use fixtures::*;
pub use generators::*;
pub use harness::*;
pub use vectors::*;
