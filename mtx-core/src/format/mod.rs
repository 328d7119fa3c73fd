//! Matrix Market text format definitions
//!
//! This module contains the header data model and its line-level codec.
//! No I/O operations, only parsing and formatting of header text.

pub mod constants;
pub mod header;

// Re-export format definitions
pub use header::{
    FieldType, FormatType, HeaderParser, MatrixMarketHeader, ObjectType, SymmetryType,
};
