//! Body writers
//!
//! Records are formatted in chunks of `chunk_size_records`. With more than
//! one thread the chunks are formatted on a rayon pool and written in order,
//! so the output is byte-identical either way.

use std::fmt::Write as _;
use std::io::Write;
use std::ops::Range;

use mtx_core::{
    FieldType, FormatType, MatrixMarketHeader, MatrixValue, MtxError, ObjectType, SymmetryType,
    ValueKind,
};
use rayon::prelude::*;
use tracing::debug;

use crate::error::{Error, Result};
use crate::header_io::write_header;
use crate::options::WriteOptions;

/// Write a coordinate matrix from parallel index and value slices
///
/// `header` supplies the dimensions, symmetry and comment; object, format,
/// field and nnz are filled in from the data. For a non-general symmetry
/// only the lower triangle (`row >= col`) is written. A pattern header or a
/// [`mtx_core::Pattern`] value type writes indices only, and `values` may
/// then be empty.
pub fn write_triplet<W: Write, V: MatrixValue>(
    writer: &mut W,
    header: &MatrixMarketHeader,
    rows: &[usize],
    cols: &[usize],
    values: &[V],
    options: &WriteOptions,
) -> Result<()> {
    if rows.len() != cols.len() {
        return Err(Error::invalid_input(format!(
            "{} row indices but {} column indices",
            rows.len(),
            cols.len()
        )));
    }
    let pattern = writes_pattern::<V>(header);
    check_values(rows.len(), values.len(), pattern)?;
    check_indices(rows, header.nrows, "Row")?;
    check_indices(cols, header.ncols, "Column")?;

    let general = header.symmetry == SymmetryType::General;
    let keep = |i: usize| general || rows[i] >= cols[i];
    let nnz = if general {
        rows.len()
    } else {
        (0..rows.len()).filter(|&i| keep(i)).count()
    };

    let mut out = header.clone();
    out.object = ObjectType::Matrix;
    out.format = FormatType::Coordinate;
    out.field = output_field::<V>(pattern);
    out.nnz = to_i64(nnz);
    write_header(writer, &out)?;

    debug!(
        nnz,
        skipped = rows.len() - nnz,
        symmetry = %out.symmetry,
        "Writing coordinate matrix"
    );

    write_chunks(writer, rows.len(), options, |range, buf| {
        for i in range.filter(|&i| keep(i)) {
            write!(buf, "{} {}", rows[i] + 1, cols[i] + 1)?;
            if !pattern {
                buf.push(' ');
                values[i].write_value(buf)?;
            }
            buf.push('\n');
        }
        Ok(())
    })
}

/// Write a coordinate vector
///
/// `header.vector_length` is the vector length.
pub fn write_vector<W: Write, V: MatrixValue>(
    writer: &mut W,
    header: &MatrixMarketHeader,
    indices: &[usize],
    values: &[V],
    options: &WriteOptions,
) -> Result<()> {
    let pattern = writes_pattern::<V>(header);
    check_values(indices.len(), values.len(), pattern)?;
    check_indices(indices, header.vector_length, "Vector")?;

    let mut out = header.clone();
    out.object = ObjectType::Vector;
    out.format = FormatType::Coordinate;
    out.field = output_field::<V>(pattern);
    out.symmetry = SymmetryType::General;
    out.nrows = header.vector_length;
    out.ncols = 1;
    out.nnz = to_i64(indices.len());
    write_header(writer, &out)?;

    debug!(nnz = indices.len(), "Writing coordinate vector");

    write_chunks(writer, indices.len(), options, |range, buf| {
        for i in range {
            write!(buf, "{}", indices[i] + 1)?;
            if !pattern {
                buf.push(' ');
                values[i].write_value(buf)?;
            }
            buf.push('\n');
        }
        Ok(())
    })
}

/// Write a dense matrix given in column-major order
pub fn write_array<W: Write, V: MatrixValue>(
    writer: &mut W,
    header: &MatrixMarketHeader,
    values: &[V],
    options: &WriteOptions,
) -> Result<()> {
    check_array(header, V::KIND)?;
    let expected = usize::try_from(header.nrows)
        .ok()
        .zip(usize::try_from(header.ncols).ok())
        .and_then(|(r, c)| r.checked_mul(c));
    if expected != Some(values.len()) {
        return Err(Error::invalid_input(format!(
            "{} values for a {}x{} array",
            values.len(),
            header.nrows,
            header.ncols
        )));
    }

    let mut out = header.clone();
    out.object = ObjectType::Matrix;
    out.format = FormatType::Array;
    out.field = V::FIELD;
    out.nnz = to_i64(values.len());
    write_header(writer, &out)?;

    debug!(nrows = out.nrows, ncols = out.ncols, "Writing array matrix");
    write_values(writer, values, options)
}

/// Write a dense vector
pub fn write_dense_vector<W: Write, V: MatrixValue>(
    writer: &mut W,
    header: &MatrixMarketHeader,
    values: &[V],
    options: &WriteOptions,
) -> Result<()> {
    check_array(header, V::KIND)?;

    let length = to_i64(values.len());
    let mut out = header.clone();
    out.object = ObjectType::Vector;
    out.format = FormatType::Array;
    out.field = V::FIELD;
    out.vector_length = length;
    out.nrows = length;
    out.ncols = 1;
    out.nnz = length;
    write_header(writer, &out)?;

    debug!(length, "Writing dense vector");
    write_values(writer, values, options)
}

fn write_values<W: Write, V: MatrixValue>(
    writer: &mut W,
    values: &[V],
    options: &WriteOptions,
) -> Result<()> {
    write_chunks(writer, values.len(), options, |range, buf| {
        for value in &values[range] {
            value.write_value(buf)?;
            buf.push('\n');
        }
        Ok(())
    })
}

/// Format `0..total` in ranges of `chunk_size_records` and write them in order
fn write_chunks<W, F>(writer: &mut W, total: usize, options: &WriteOptions, format: F) -> Result<()>
where
    W: Write,
    F: Fn(Range<usize>, &mut String) -> std::fmt::Result + Sync,
{
    let per_chunk = options.records_per_chunk();
    let ranges: Vec<Range<usize>> = (0..total)
        .step_by(per_chunk)
        .map(|start| start..(start + per_chunk).min(total))
        .collect();

    if options.num_threads <= 1 {
        let mut buf = String::new();
        for range in ranges {
            buf.clear();
            format(range, &mut buf)?;
            writer.write_all(buf.as_bytes())?;
        }
        return Ok(());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.num_threads)
        .build()?;
    for batch in ranges.chunks(options.num_threads * 2) {
        let formatted: Vec<std::result::Result<String, std::fmt::Error>> = pool.install(|| {
            batch
                .par_iter()
                .map(|range| {
                    let mut buf = String::new();
                    format(range.clone(), &mut buf)?;
                    Ok(buf)
                })
                .collect()
        });
        for text in formatted {
            writer.write_all(text?.as_bytes())?;
        }
    }
    Ok(())
}

fn writes_pattern<V: MatrixValue>(header: &MatrixMarketHeader) -> bool {
    header.field == FieldType::Pattern || V::KIND == ValueKind::Pattern
}

fn output_field<V: MatrixValue>(pattern: bool) -> FieldType {
    if pattern {
        FieldType::Pattern
    } else {
        V::FIELD
    }
}

fn check_values(records: usize, values: usize, pattern: bool) -> Result<()> {
    if values == records || (pattern && values == 0) {
        Ok(())
    } else {
        Err(Error::invalid_input(format!(
            "{values} values for {records} indices"
        )))
    }
}

fn check_indices(indices: &[usize], limit: i64, what: &str) -> Result<()> {
    let limit = usize::try_from(limit).unwrap_or(0);
    match indices.iter().find(|&&i| i >= limit) {
        Some(index) => Err(Error::invalid_input(format!(
            "{what} index {index} outside dimension {limit}"
        ))),
        None => Ok(()),
    }
}

fn check_array(header: &MatrixMarketHeader, kind: ValueKind) -> Result<()> {
    if header.symmetry != SymmetryType::General {
        return Err(MtxError::NotImplemented(
            "Non-general symmetry for array matrices not implemented.",
        )
        .into());
    }
    if kind == ValueKind::Pattern || header.field == FieldType::Pattern {
        return Err(MtxError::NotImplemented("Pattern arrays not implemented.").into());
    }
    Ok(())
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
