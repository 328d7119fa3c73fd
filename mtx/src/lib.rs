//! MTX - Matrix Market Text Codec
//!
//! This library reads and writes sparse and dense matrices in the Matrix
//! Market exchange format, streaming bodies in line-aligned chunks that can
//! be tokenized on a thread pool.
//!
//! ## Architecture
//!
//! MTX follows a format/implementation separation:
//!
//! - **mtx-core**: Header model, value and handler traits, tokenizers and
//!   type adapters (no I/O, `no_std`)
//! - **mtx**: Streams, chunking, parallel parsing, writers and files
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mtx::{MtxFile, ReadOptions, TripletMatrix};
//!
//! fn example() -> mtx::Result<()> {
//!     let file = MtxFile::open("matrix.mtx")?;
//!     let options = ReadOptions::default().with_num_threads(4);
//!     let (header, matrix) = file.read_triplet::<f64>(&options)?;
//!
//!     println!("{}x{} with {} entries", header.nrows, header.ncols, matrix.len());
//!     Ok(())
//! }
//! ```
//!
//! Any [`Handler`] can receive entries directly:
//!
//! ```rust
//! use mtx::{read_body, read_header, PatternSubstitute, ReadOptions};
//!
//! let text = "%%MatrixMarket matrix coordinate integer general\n2 2 1\n2 1 7\n";
//! let mut reader = text.as_bytes();
//! let mut header = read_header(&mut reader).unwrap();
//!
//! let mut entries: Vec<(usize, usize, i64)> = Vec::new();
//! read_body(
//!     &mut reader,
//!     &mut header,
//!     &mut entries,
//!     PatternSubstitute::default(),
//!     &ReadOptions::default(),
//! )
//! .unwrap();
//! assert_eq!(entries, vec![(1, 0, 7)]);
//! ```
//!
//! ## Features
//!
//! - **mmap**: Memory-mapped file reading
//! - **async**: Tokio-based file writing
//! - **serde**: Serialization of headers, options and containers

// Re-export core abstractions and format definitions
pub use mtx_core::{
    // Format definitions
    FieldType, FormatType, MatrixMarketHeader, ObjectType, SymmetryType,
    // Core traits
    Handler, MatrixValue, Pattern, ValueKind,
    // Type adaptation
    Adaptation, PatternSubstitute,
    // Format errors
    MtxError,
};

// Complex value type accepted by every reader and writer
pub use num_complex::Complex;

pub mod body;
pub mod chunk_reader;
pub mod containers;
pub mod error;
pub mod file_io;
pub mod header_io;
pub mod options;
pub mod writer;

pub use body::{read_body, read_body_direct};
pub use chunk_reader::{next_chunk, Chunk, ChunkReader};
pub use containers::{DenseMatrix, TripletMatrix};
pub use error::{Error, Result};
pub use file_io::MtxFile;
pub use header_io::{read_header, write_header};
pub use options::{ReadOptions, WriteOptions};
pub use writer::{write_array, write_dense_vector, write_triplet, write_vector};
