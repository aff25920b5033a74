//! Shared helpers for the byteio benchmarks.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
