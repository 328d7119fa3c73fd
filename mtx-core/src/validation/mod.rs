//! Scanning and validation utilities for body records
//!
//! Pure functions over byte slices, no I/O.

pub mod bounds;
pub mod parsing;

pub use bounds::{checked_index, dimension};
pub use parsing::{parse_complex, parse_float, parse_int, ChunkCursor, ScanError};
