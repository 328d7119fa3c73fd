#![no_std]

//! MTX Core - Matrix Market Format Definitions
//!
//! This crate provides the header model, value and handler traits, the
//! bounds-checked chunk tokenizers and the type adaptation layer for the
//! Matrix Market text format. It performs no I/O; stream handling lives in
//! the `mtx` crate.

extern crate alloc;

pub mod adapters;
pub mod error;
pub mod format;
pub mod tokenizer;
pub mod traits;
pub mod validation;

pub use adapters::*;
pub use error::*;
pub use format::*;
pub use tokenizer::*;
pub use traits::*;
pub use validation::{parse_complex, parse_float, parse_int, ChunkCursor, ScanError};
