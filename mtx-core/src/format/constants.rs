//! Format constants for the Matrix Market text format

/// Banner every Matrix Market file starts with
pub const BANNER: &str = "%%MatrixMarket";

/// Non-conforming single-`%` banner emitted by some packages; accepted on read
pub const BANNER_LENIENT: &str = "%MatrixMarket";

/// Marker that starts a comment line
pub const COMMENT_MARKER: char = '%';

/// Bytes kept free at the end of a chunk to complete the last line
pub const CHUNK_LINE_RESERVE: usize = 4096;

/// Default target chunk size for body reads
pub const DEFAULT_CHUNK_SIZE_BYTES: usize = 1 << 20;

/// Default number of records formatted per chunk when writing
pub const DEFAULT_WRITE_CHUNK_RECORDS: usize = 1 << 14;
