//! Line-aligned chunking of Matrix Market bodies
//!
//! A chunk is roughly `chunk_size_bytes` long and always ends on a line
//! boundary (or at end of input), so each chunk can be tokenized on its own.
//! Whitespace-only lines at the very end of the input are dropped.

use std::io::{BufRead, Read};

use mtx_core::format::constants::CHUNK_LINE_RESERVE;

use crate::error::Result;

/// One line-aligned slice of the body
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chunk(Vec<u8>);

impl Chunk {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Number of lines in the chunk, counting an unterminated tail
    pub fn line_count(&self) -> i64 {
        let newlines = self.0.iter().filter(|&&b| b == b'\n').count();
        let tail = usize::from(self.0.last().is_some_and(|&b| b != b'\n'));
        i64::try_from(newlines + tail).unwrap_or(i64::MAX)
    }

    /// True if every line is empty or whitespace
    pub fn is_blank(&self) -> bool {
        self.0.iter().all(|&b| is_blank_byte(b))
    }

    /// Drop trailing whitespace-only lines
    fn trim_blank_tail(&mut self) {
        let keep = match self.0.iter().rposition(|&b| !is_blank_byte(b)) {
            Some(last) => self.0[last..]
                .iter()
                .position(|&b| b == b'\n')
                .map_or(self.0.len(), |newline| last + newline + 1),
            None => 0,
        };
        self.0.truncate(keep);
    }
}

fn is_blank_byte(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r' | b'\n')
}

impl AsRef<[u8]> for Chunk {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Read the next chunk from `reader`
///
/// Reads `target_size - 4096` bytes (nothing if the target is smaller) and
/// then completes the current line. An empty chunk means end of input.
pub fn next_chunk<R: BufRead>(reader: &mut R, target_size: usize) -> Result<Chunk> {
    let bulk = target_size.saturating_sub(CHUNK_LINE_RESERVE);
    let mut buf = Vec::with_capacity(target_size.max(1));

    if bulk > 0 {
        let limit = u64::try_from(bulk).unwrap_or(u64::MAX);
        let read = reader.by_ref().take(limit).read_to_end(&mut buf)?;
        if read < bulk {
            return Ok(Chunk(buf));
        }
    }

    if buf.last() != Some(&b'\n') {
        reader.read_until(b'\n', &mut buf)?;
    }
    Ok(Chunk(buf))
}

/// Iterator over the line-aligned chunks of a stream
///
/// Keeps one chunk of lookahead so that blank lines at end of input can be
/// told apart from blank lines inside the body.
pub struct ChunkReader<R: BufRead> {
    reader: R,
    chunk_size: usize,
    pending: Option<Chunk>,
    done: bool,
}

impl<R: BufRead> ChunkReader<R> {
    pub fn new(reader: R, chunk_size: usize) -> Self {
        Self {
            reader,
            chunk_size,
            pending: None,
            done: false,
        }
    }

    fn read_raw(&mut self) -> Result<Option<Chunk>> {
        if self.done {
            return Ok(None);
        }
        let chunk = next_chunk(&mut self.reader, self.chunk_size)?;
        if chunk.is_empty() {
            self.done = true;
            return Ok(None);
        }
        Ok(Some(chunk))
    }

    /// Next non-empty chunk, or `None` at end of input
    pub fn next_chunk(&mut self) -> Result<Option<Chunk>> {
        let mut current = match self.pending.take() {
            Some(chunk) => chunk,
            None => match self.read_raw()? {
                Some(chunk) => chunk,
                None => return Ok(None),
            },
        };

        // Blank chunks are held back until a record or end of input follows
        loop {
            match self.read_raw()? {
                Some(next) if next.is_blank() => current.0.extend_from_slice(&next.0),
                Some(next) => {
                    self.pending = Some(next);
                    return Ok(Some(current));
                }
                None => {
                    current.trim_blank_tail();
                    return Ok((!current.is_empty()).then_some(current));
                }
            }
        }
    }

    /// Read up to `count` chunks
    pub fn next_batch(&mut self, count: usize) -> Result<Vec<Chunk>> {
        let mut batch = Vec::with_capacity(count);
        while batch.len() < count {
            match self.next_chunk()? {
                Some(chunk) => batch.push(chunk),
                None => break,
            }
        }
        Ok(batch)
    }
}

impl<R: BufRead> Iterator for ChunkReader<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_chunk().transpose()
    }
}
