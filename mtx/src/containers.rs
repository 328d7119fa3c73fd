//! In-memory matrix containers
//!
//! [`TripletMatrix`] collects coordinate entries, [`DenseMatrix`] fills a
//! column-major buffer. Both are [`Handler`]s and carry read and write
//! helpers that run the whole header plus body cycle.

use std::io::{BufRead, Write};

use mtx_core::{
    FormatType, Handler, MatrixMarketHeader, MatrixValue, PatternSubstitute, SymmetryType,
};

use crate::body::read_body;
use crate::error::{Error, Result};
use crate::header_io::read_header;
use crate::options::{ReadOptions, WriteOptions};
use crate::writer::{write_array, write_triplet};

/// Upper bound on entries reserved from the header's `nnz` before reading
const MAX_RESERVED_ENTRIES: usize = 1 << 20;

/// Sparse matrix as parallel row, column and value vectors (0-based)
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripletMatrix<V> {
    pub nrows: usize,
    pub ncols: usize,
    pub rows: Vec<usize>,
    pub cols: Vec<usize>,
    pub values: Vec<V>,
}

impl<V: MatrixValue> TripletMatrix<V> {
    pub fn new(nrows: usize, ncols: usize) -> Self {
        Self::with_capacity(nrows, ncols, 0)
    }

    pub fn with_capacity(nrows: usize, ncols: usize, capacity: usize) -> Self {
        Self {
            nrows,
            ncols,
            rows: Vec::with_capacity(capacity),
            cols: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, row: usize, col: usize, value: V) {
        self.rows.push(row);
        self.cols.push(col);
        self.values.push(value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, V)> + '_ {
        self.rows
            .iter()
            .zip(&self.cols)
            .zip(&self.values)
            .map(|((&row, &col), &value)| (row, col, value))
    }

    /// Read a coordinate or array file
    ///
    /// Pattern entries get the value `1`.
    pub fn read<R: BufRead>(
        reader: &mut R,
        options: &ReadOptions,
    ) -> Result<(MatrixMarketHeader, Self)> {
        Self::read_with_substitute(reader, PatternSubstitute::default(), options)
    }

    pub fn read_with_substitute<R: BufRead>(
        reader: &mut R,
        substitute: PatternSubstitute<V>,
        options: &ReadOptions,
    ) -> Result<(MatrixMarketHeader, Self)> {
        let mut header = read_header(reader)?;

        // Mirrored entries can double the record count
        let mut capacity = usize::try_from(header.nnz).unwrap_or(0);
        if options.generalize_symmetry && header.symmetry != SymmetryType::General {
            capacity = capacity.saturating_mul(2);
        }
        let mut matrix = Self::with_capacity(
            usize::try_from(header.nrows).unwrap_or(0),
            usize::try_from(header.ncols).unwrap_or(0),
            capacity.min(MAX_RESERVED_ENTRIES),
        );

        read_body(reader, &mut header, &mut matrix, substitute, options)?;
        Ok((header, matrix))
    }

    /// Write as a coordinate matrix
    ///
    /// `header` contributes symmetry and comment; dimensions come from `self`.
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        header: &MatrixMarketHeader,
        options: &WriteOptions,
    ) -> Result<()> {
        let mut header = header.clone();
        header.nrows = to_i64(self.nrows)?;
        header.ncols = to_i64(self.ncols)?;
        write_triplet(
            writer,
            &header,
            &self.rows,
            &self.cols,
            &self.values,
            options,
        )
    }
}

impl<V: MatrixValue> Handler for TripletMatrix<V> {
    type Value = V;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, value: V) {
        self.push(row, col, value);
    }
}

/// Dense matrix stored column-major
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DenseMatrix<V> {
    pub nrows: usize,
    pub ncols: usize,
    pub values: Vec<V>,
}

impl<V: MatrixValue> DenseMatrix<V> {
    /// Zero-filled matrix
    pub fn zeros(nrows: usize, ncols: usize) -> Result<Self> {
        let len = nrows
            .checked_mul(ncols)
            .ok_or_else(|| Error::invalid_input(format!("{nrows}x{ncols} matrix is too large")))?;
        let mut values = Vec::new();
        values
            .try_reserve_exact(len)
            .map_err(|err| Error::invalid_input(format!("{nrows}x{ncols} matrix: {err}")))?;
        values.resize(len, V::zero());
        Ok(Self {
            nrows,
            ncols,
            values,
        })
    }

    pub fn get(&self, row: usize, col: usize) -> Option<V> {
        if row >= self.nrows || col >= self.ncols {
            return None;
        }
        self.values.get(col * self.nrows + row).copied()
    }

    /// Read any layout into a dense buffer
    ///
    /// Coordinate entries are scattered; duplicates keep the last value.
    pub fn read<R: BufRead>(
        reader: &mut R,
        options: &ReadOptions,
    ) -> Result<(MatrixMarketHeader, Self)> {
        let mut header = read_header(reader)?;
        let mut matrix = Self::zeros(
            usize::try_from(header.nrows).unwrap_or(0),
            usize::try_from(header.ncols).unwrap_or(0),
        )?;
        read_body(
            reader,
            &mut header,
            &mut matrix,
            PatternSubstitute::default(),
            options,
        )?;
        Ok((header, matrix))
    }

    /// Write as an array matrix
    pub fn write<W: Write>(
        &self,
        writer: &mut W,
        header: &MatrixMarketHeader,
        options: &WriteOptions,
    ) -> Result<()> {
        let mut header = header.clone();
        header.format = FormatType::Array;
        header.nrows = to_i64(self.nrows)?;
        header.ncols = to_i64(self.ncols)?;
        write_array(writer, &header, &self.values, options)
    }
}

impl<V: MatrixValue> Handler for DenseMatrix<V> {
    type Value = V;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, value: V) {
        // Indices are bounds-checked against the header before they get here
        if let Some(slot) = self.values.get_mut(col * self.nrows + row) {
            *slot = value;
        }
    }
}

fn to_i64(n: usize) -> Result<i64> {
    i64::try_from(n).map_err(|_| Error::invalid_input(format!("dimension {n} out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use num_complex::Complex;

    const SYMMETRIC: &str = "%%MatrixMarket matrix coordinate real symmetric\n3 3 3\n1 1 2\n3 1 -1\n3 2 0.5\n";

    #[test]
    fn test_triplet_read_expands_symmetry() {
        let (header, matrix) =
            TripletMatrix::<f64>::read(&mut SYMMETRIC.as_bytes(), &ReadOptions::default()).unwrap();

        assert_eq!(header.symmetry, SymmetryType::General);
        assert_eq!((matrix.nrows, matrix.ncols), (3, 3));
        assert_eq!(
            matrix.iter().collect::<Vec<_>>(),
            vec![
                (0, 0, 2.0),
                (2, 0, -1.0),
                (0, 2, -1.0),
                (2, 1, 0.5),
                (1, 2, 0.5)
            ]
        );
    }

    #[test]
    fn test_triplet_write_then_read() {
        let mut matrix = TripletMatrix::new(4, 2);
        matrix.push(3, 1, Complex::new(1.0f32, 2.0));
        matrix.push(0, 0, Complex::new(-0.5f32, 0.0));

        let mut out = Vec::new();
        matrix
            .write(&mut out, &MatrixMarketHeader::default(), &WriteOptions::default())
            .unwrap();

        let (header, read) =
            TripletMatrix::<Complex<f32>>::read(&mut out.as_slice(), &ReadOptions::default())
                .unwrap();
        assert_eq!(header.field, mtx_core::FieldType::Complex);
        assert_eq!(read, matrix);
    }

    #[test]
    fn test_dense_from_coordinate_and_array() {
        let (_, dense) =
            DenseMatrix::<f64>::read(&mut SYMMETRIC.as_bytes(), &ReadOptions::default()).unwrap();
        assert_eq!(dense.get(0, 2), Some(-1.0));
        assert_eq!(dense.get(1, 1), Some(0.0));
        assert_eq!(dense.get(3, 0), None);

        let mut out = Vec::new();
        dense
            .write(&mut out, &MatrixMarketHeader::default(), &WriteOptions::default())
            .unwrap();
        let (header, reread) =
            DenseMatrix::<f64>::read(&mut out.as_slice(), &ReadOptions::default()).unwrap();
        assert_eq!(header.format, FormatType::Array);
        assert_eq!(reread, dense);
    }

    #[test]
    fn test_huge_nnz_reports_truncation() {
        let text = "%%MatrixMarket matrix coordinate real symmetric\n3 3 2305843009213693952\n1 1 1\n";
        let err = TripletMatrix::<f64>::read(&mut text.as_bytes(), &ReadOptions::default())
            .unwrap_err();
        assert_eq!(
            err.as_format(),
            Some(&mtx_core::MtxError::TruncatedFile {
                missing: 2305843009213693951
            })
        );

        let raw = ReadOptions::default().with_generalize_symmetry(false);
        let err = TripletMatrix::<f64>::read(&mut text.as_bytes(), &raw).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(mtx_core::MtxError::TruncatedFile { .. })
        ));
    }

    #[test]
    fn test_dense_too_large_is_invalid_input() {
        let err = DenseMatrix::<f64>::zeros(usize::MAX / 2, 3).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));

        let err = DenseMatrix::<f64>::zeros(usize::MAX / 8, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidInput { .. }));
    }
}
