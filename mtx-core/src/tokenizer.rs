//! Chunk tokenizers for Matrix Market bodies
//!
//! Each tokenizer walks one line-aligned chunk, decodes one record per line
//! and forwards it to a [`Handler`]. The only state that crosses chunk
//! boundaries is [`BodyPosition`]: the running line count and, for array
//! bodies, the column-major fill cursor.

use alloc::string::ToString;

use crate::error::{MtxError, Result};
use crate::format::{FormatType, MatrixMarketHeader, ObjectType, SymmetryType};
use crate::traits::{Handler, MatrixValue};
use crate::validation::{checked_index, dimension, ChunkCursor, ScanError};

/// Position of the next record in the body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyPosition {
    /// Lines consumed so far, header included
    pub line_num: i64,
    /// Array fill cursor row
    pub row: usize,
    /// Array fill cursor column
    pub col: usize,
}

impl BodyPosition {
    /// Position of the first body record
    pub fn start(header: &MatrixMarketHeader) -> Self {
        Self {
            line_num: header.header_line_count,
            row: 0,
            col: 0,
        }
    }

    /// Position after `records` body records have been consumed
    ///
    /// Lets a chunk be tokenized without its predecessors, given only how
    /// many lines they hold.
    pub fn at_record(header: &MatrixMarketHeader, records: i64) -> Self {
        let mut position = Self::start(header);
        position.line_num = position.line_num.saturating_add(records);

        let nrows = dimension(header.nrows);
        if header.format == FormatType::Array && nrows > 0 {
            let index = usize::try_from(records).unwrap_or(0);
            position.row = index % nrows;
            position.col = index / nrows;
        }
        position
    }

    /// Records consumed so far
    pub fn records(&self, header: &MatrixMarketHeader) -> i64 {
        self.line_num - header.header_line_count
    }

    /// 1-based file line of the record about to be read
    fn current_line(&self) -> i64 {
        self.line_num + 1
    }
}

fn body_error(position: &BodyPosition, err: ScanError) -> MtxError {
    MtxError::malformed_body(position.current_line(), err.to_string())
}

/// Tokenize one chunk with the record shape the header declares
pub fn parse_chunk<H: Handler>(
    chunk: &[u8],
    header: &MatrixMarketHeader,
    position: &mut BodyPosition,
    handler: &mut H,
    generalize_symmetry: bool,
) -> Result<()> {
    match (header.format, header.object) {
        (FormatType::Coordinate, ObjectType::Matrix) => read_chunk_matrix_coordinate(
            chunk,
            header,
            position,
            handler,
            generalize_symmetry,
        ),
        (FormatType::Coordinate, ObjectType::Vector) => {
            read_chunk_vector_coordinate(chunk, header, position, handler)
        }
        (FormatType::Array, _) => read_chunk_array(chunk, header, position, handler),
    }
}

/// Tokenize `row col value` records
pub fn read_chunk_matrix_coordinate<H: Handler>(
    chunk: &[u8],
    header: &MatrixMarketHeader,
    position: &mut BodyPosition,
    handler: &mut H,
    generalize_symmetry: bool,
) -> Result<()> {
    let mirror = generalize_symmetry && header.symmetry != SymmetryType::General;
    let mut cursor = ChunkCursor::new(chunk);

    while !cursor.is_at_end() {
        let row = cursor.read_int().map_err(|e| body_error(&*position, e))?;
        let col = cursor.read_int().map_err(|e| body_error(&*position, e))?;
        let value = <H::Value as MatrixValue>::read(&mut cursor)
            .map_err(|e| body_error(&*position, e))?;
        cursor.bump_to_next_line();

        let line = position.current_line();
        let row = checked_index(row, header.nrows)
            .ok_or(MtxError::index_out_of_bounds(line, "Row index out of bounds"))?;
        let col = checked_index(col, header.ncols)
            .ok_or(MtxError::index_out_of_bounds(line, "Column index out of bounds"))?;

        handler.handle(row, col, value);

        if mirror && row != col {
            let mirrored = match header.symmetry {
                SymmetryType::General => None,
                SymmetryType::Symmetric => Some(value),
                SymmetryType::SkewSymmetric => Some(value.negate()),
                SymmetryType::Hermitian => Some(value.conjugate()),
            };
            if let Some(mirrored) = mirrored {
                handler.handle(col, row, mirrored);
            }
        }

        position.line_num += 1;
    }
    Ok(())
}

/// Tokenize `index value` records
pub fn read_chunk_vector_coordinate<H: Handler>(
    chunk: &[u8],
    header: &MatrixMarketHeader,
    position: &mut BodyPosition,
    handler: &mut H,
) -> Result<()> {
    let mut cursor = ChunkCursor::new(chunk);

    while !cursor.is_at_end() {
        let index = cursor.read_int().map_err(|e| body_error(&*position, e))?;
        let value = <H::Value as MatrixValue>::read(&mut cursor)
            .map_err(|e| body_error(&*position, e))?;
        cursor.bump_to_next_line();

        let index = checked_index(index, header.vector_length).ok_or(
            MtxError::index_out_of_bounds(position.current_line(), "Index out of bounds"),
        )?;

        handler.handle(index, 0, value);
        position.line_num += 1;
    }
    Ok(())
}

/// Tokenize bare values, placing them column-major
pub fn read_chunk_array<H: Handler>(
    chunk: &[u8],
    header: &MatrixMarketHeader,
    position: &mut BodyPosition,
    handler: &mut H,
) -> Result<()> {
    let nrows = dimension(header.nrows);
    let ncols = dimension(header.ncols);
    let mut cursor = ChunkCursor::new(chunk);

    while !cursor.is_at_end() {
        if position.col >= ncols || nrows == 0 {
            return Err(MtxError::malformed_body(
                position.current_line(),
                "Too many values in array",
            ));
        }

        let value = <H::Value as MatrixValue>::read(&mut cursor)
            .map_err(|e| body_error(&*position, e))?;
        cursor.bump_to_next_line();

        handler.handle(position.row, position.col, value);

        // Matrix Market arrays are column-major
        position.row += 1;
        if position.row == nrows {
            position.row = 0;
            position.col += 1;
        }

        position.line_num += 1;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::FieldType;
    use crate::traits::Pattern;
    use alloc::vec;
    use alloc::vec::Vec;
    use num_complex::Complex;

    fn coordinate(nrows: i64, ncols: i64, nnz: i64, symmetry: SymmetryType) -> MatrixMarketHeader {
        let mut header = MatrixMarketHeader::new(nrows, ncols).with_symmetry(symmetry);
        header.nnz = nnz;
        header.header_line_count = 2;
        header
    }

    fn parse<V: MatrixValue>(
        body: &[u8],
        header: &MatrixMarketHeader,
        generalize: bool,
    ) -> Result<Vec<(usize, usize, V)>> {
        let mut out = Vec::new();
        let mut position = BodyPosition::start(header);
        parse_chunk(body, header, &mut position, &mut out, generalize)?;
        Ok(out)
    }

    #[test]
    fn test_coordinate_records() {
        let header = coordinate(3, 3, 2, SymmetryType::General);
        let out = parse::<f64>(b"1 1 2.5\n3 2 -1\n", &header, true).unwrap();
        assert_eq!(out, vec![(0, 0, 2.5), (2, 1, -1.0)]);
    }

    #[test]
    fn test_symmetric_expansion() {
        let header = coordinate(3, 3, 2, SymmetryType::Symmetric);

        let out = parse::<f64>(b"1 2 5\n3 3 1\n", &header, true).unwrap();
        assert_eq!(out, vec![(0, 1, 5.0), (1, 0, 5.0), (2, 2, 1.0)]);

        let out = parse::<f64>(b"1 2 5\n3 3 1\n", &header, false).unwrap();
        assert_eq!(out, vec![(0, 1, 5.0), (2, 2, 1.0)]);
    }

    #[test]
    fn test_skew_symmetric_negates_mirror() {
        let header = coordinate(3, 3, 1, SymmetryType::SkewSymmetric);
        let out = parse::<i64>(b"2 1 4\n", &header, true).unwrap();
        assert_eq!(out, vec![(1, 0, 4), (0, 1, -4)]);
    }

    #[test]
    fn test_hermitian_conjugates_mirror() {
        let header = coordinate(2, 2, 1, SymmetryType::Hermitian);
        let out = parse::<Complex<f64>>(b"2 1 1.5 2\n", &header, true).unwrap();
        assert_eq!(
            out,
            vec![(1, 0, Complex::new(1.5, 2.0)), (0, 1, Complex::new(1.5, -2.0))]
        );
    }

    #[test]
    fn test_row_out_of_bounds_reports_line() {
        let header = coordinate(3, 3, 2, SymmetryType::General);

        let err = parse::<f64>(b"1 1 1\n4 1 1\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::index_out_of_bounds(4, "Row index out of bounds"));

        let err = parse::<f64>(b"0 1 1\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::index_out_of_bounds(3, "Row index out of bounds"));

        let err = parse::<f64>(b"1 9 1\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::index_out_of_bounds(3, "Column index out of bounds"));
    }

    #[test]
    fn test_bad_value_is_malformed_body() {
        let header = coordinate(3, 3, 2, SymmetryType::General);
        let err = parse::<f64>(b"1 1 1\n2 2 x\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::malformed_body(4, "Invalid number"));

        let err = parse::<f64>(b"1 1\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::malformed_body(3, "Missing value"));
    }

    #[test]
    fn test_pattern_records_take_no_value() {
        let mut header = coordinate(3, 3, 1, SymmetryType::General);
        header.field = FieldType::Pattern;
        let out = parse::<Pattern>(b"2 3\n", &header, true).unwrap();
        assert_eq!(out, vec![(1, 2, Pattern)]);
    }

    #[test]
    fn test_vector_coordinate() {
        let mut header = MatrixMarketHeader::vector(4);
        header.nnz = 2;
        header.header_line_count = 2;

        let out = parse::<f64>(b"4 1.5\n1 2\n", &header, true).unwrap();
        assert_eq!(out, vec![(3, 0, 1.5), (0, 0, 2.0)]);

        let err = parse::<f64>(b"5 1.5\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::index_out_of_bounds(3, "Index out of bounds"));
    }

    #[test]
    fn test_array_column_major_fill() {
        let mut header = MatrixMarketHeader::new(2, 3);
        header.format = FormatType::Array;
        header.nnz = 6;
        header.header_line_count = 2;

        let out = parse::<f64>(b"1\n2\n3\n4\n5\n6\n", &header, true).unwrap();
        assert_eq!(
            out,
            vec![
                (0, 0, 1.0),
                (1, 0, 2.0),
                (0, 1, 3.0),
                (1, 1, 4.0),
                (0, 2, 5.0),
                (1, 2, 6.0)
            ]
        );

        let err = parse::<f64>(b"1\n2\n3\n4\n5\n6\n7\n", &header, true).unwrap_err();
        assert_eq!(err, MtxError::malformed_body(9, "Too many values in array"));
    }

    #[test]
    fn test_array_cursor_threads_across_chunks() {
        let mut header = MatrixMarketHeader::new(2, 2);
        header.format = FormatType::Array;
        header.nnz = 4;
        header.header_line_count = 2;

        let mut out: Vec<(usize, usize, i32)> = Vec::new();
        let mut position = BodyPosition::start(&header);
        parse_chunk(b"1\n2\n3\n", &header, &mut position, &mut out, true).unwrap();
        assert_eq!(position, BodyPosition { line_num: 5, row: 1, col: 1 });
        assert_eq!(BodyPosition::at_record(&header, 3), position);

        parse_chunk(b"4\n", &header, &mut position, &mut out, true).unwrap();
        assert_eq!(out.last(), Some(&(1, 1, 4)));
        assert_eq!(position.records(&header), 4);
    }
}
