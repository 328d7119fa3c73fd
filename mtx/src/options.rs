//! Read and write configuration
//!
//! Builder-style option structs for body reading and writing.

use mtx_core::format::constants::{DEFAULT_CHUNK_SIZE_BYTES, DEFAULT_WRITE_CHUNK_RECORDS};

/// Configuration for reading a Matrix Market body
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReadOptions {
    /// Target size of each body chunk in bytes
    pub chunk_size_bytes: usize,
    /// Emit the mirrored entries of symmetric, skew-symmetric and Hermitian matrices
    pub generalize_symmetry: bool,
    /// Worker threads tokenizing chunks; 1 parses on the calling thread
    pub num_threads: usize,
}

impl ReadOptions {
    /// Set the target chunk size in bytes
    pub fn with_chunk_size_bytes(mut self, chunk_size_bytes: usize) -> Self {
        self.chunk_size_bytes = chunk_size_bytes;
        self
    }

    /// Enable or disable symmetry generalization
    pub fn with_generalize_symmetry(mut self, generalize_symmetry: bool) -> Self {
        self.generalize_symmetry = generalize_symmetry;
        self
    }

    /// Set the number of parser threads (0 is treated as 1)
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    /// Use every available core
    pub fn with_all_threads(self) -> Self {
        let threads = std::thread::available_parallelism().map_or(1, |n| n.get());
        self.with_num_threads(threads)
    }

    /// Whether chunks are dispatched to worker threads
    pub fn is_parallel(&self) -> bool {
        self.num_threads > 1
    }

    /// Chunks read ahead per parallel batch
    pub fn batch_size(&self) -> usize {
        self.num_threads.max(1) * 2
    }
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            chunk_size_bytes: DEFAULT_CHUNK_SIZE_BYTES,
            generalize_symmetry: true,
            num_threads: 1,
        }
    }
}

/// Configuration for writing a Matrix Market body
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WriteOptions {
    /// Records formatted per chunk
    pub chunk_size_records: usize,
    /// Worker threads formatting chunks; 1 formats on the calling thread
    pub num_threads: usize,
}

impl WriteOptions {
    /// Set the number of records per formatted chunk (0 is treated as 1)
    pub fn with_chunk_size_records(mut self, chunk_size_records: usize) -> Self {
        self.chunk_size_records = chunk_size_records;
        self
    }

    /// Set the number of formatter threads
    pub fn with_num_threads(mut self, num_threads: usize) -> Self {
        self.num_threads = num_threads;
        self
    }

    pub(crate) fn records_per_chunk(&self) -> usize {
        self.chunk_size_records.max(1)
    }
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            chunk_size_records: DEFAULT_WRITE_CHUNK_RECORDS,
            num_threads: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_defaults() {
        let options = ReadOptions::default();
        assert_eq!(options.chunk_size_bytes, 1 << 20);
        assert!(options.generalize_symmetry);
        assert!(!options.is_parallel());
    }

    #[test]
    fn test_builders() {
        let options = ReadOptions::default()
            .with_chunk_size_bytes(15)
            .with_generalize_symmetry(false)
            .with_num_threads(4);
        assert_eq!(options.chunk_size_bytes, 15);
        assert!(!options.generalize_symmetry);
        assert!(options.is_parallel());
        assert_eq!(options.batch_size(), 8);

        let write = WriteOptions::default().with_chunk_size_records(0);
        assert_eq!(write.records_per_chunk(), 1);
    }
}
