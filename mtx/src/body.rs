//! Body reading
//!
//! Drives the chunk reader and the tokenizers, places the adapters the
//! header calls for in front of the caller's handler and checks the body
//! for truncation once input runs out.

use std::io::BufRead;

use mtx_core::{
    adaptation_for, parse_chunk, Adaptation, BodyPosition, ComplexAdapter, FieldType, FormatType,
    Handler, MatrixMarketHeader, MtxError, ObjectType, PatternAdapter, PatternSubstitute,
    SymmetryType,
};
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::chunk_reader::{Chunk, ChunkReader};
use crate::error::Result;
use crate::options::ReadOptions;

/// Read the body described by `header` into `handler`
///
/// The handler's value type decides how the declared field is adapted: a
/// pattern file forwards `substitute` for every entry, real and integer
/// files are promoted for complex handlers, and a complex file fails with
/// [`MtxError::ComplexIncompatible`] for any other handler.
///
/// When `options.generalize_symmetry` is set, the mirrored entry of every
/// off-diagonal record is emitted as well and, on success, `header.symmetry`
/// is rewritten to [`SymmetryType::General`]. The header then describes what
/// the handler received rather than what is stored on disk.
pub fn read_body<R, H>(
    reader: &mut R,
    header: &mut MatrixMarketHeader,
    handler: &mut H,
    substitute: PatternSubstitute<H::Value>,
    options: &ReadOptions,
) -> Result<()>
where
    R: BufRead,
    H: Handler,
{
    let adaptation = adaptation_for(header.field, &substitute)?;
    debug!(?adaptation, field = %header.field, "Reading Matrix Market body");

    let position = match (adaptation, substitute) {
        (Adaptation::Direct, _) => read_body_direct(reader, header, handler, options)?,
        (Adaptation::PatternThenComplex, PatternSubstitute::Real(real)) => {
            let mut adapter = PatternAdapter::new(ComplexAdapter::new(&mut *handler), real);
            read_body_direct(reader, header, &mut adapter, options)?
        }
        (Adaptation::Pattern | Adaptation::PatternThenComplex, substitute) => {
            let mut adapter = PatternAdapter::new(&mut *handler, substitute.into_value());
            read_body_direct(reader, header, &mut adapter, options)?
        }
        (Adaptation::ComplexPromotion, _) => {
            let mut adapter = ComplexAdapter::new(&mut *handler);
            read_body_direct(reader, header, &mut adapter, options)?
        }
    };

    if options.generalize_symmetry && header.symmetry != SymmetryType::General {
        header.symmetry = SymmetryType::General;
    }

    debug!(
        records = position.records(header),
        "Finished reading Matrix Market body"
    );
    Ok(())
}

/// Read the body into a handler whose value type matches the file
///
/// No field adaptation happens here; the handler's value type is parsed
/// directly. Returns the position after the last record.
pub fn read_body_direct<R, H>(
    reader: &mut R,
    header: &MatrixMarketHeader,
    handler: &mut H,
    options: &ReadOptions,
) -> Result<BodyPosition>
where
    R: BufRead,
    H: Handler,
{
    check_supported(header, options)?;

    let chunks = ChunkReader::new(reader, options.chunk_size_bytes);
    let position = if options.is_parallel() {
        read_chunks_parallel(chunks, header, handler, options)?
    } else {
        read_chunks(chunks, header, handler, options)?
    };

    let consumed = position.line_num;
    let expected = header.expected_line_count();
    if consumed < expected {
        return Err(MtxError::TruncatedFile {
            missing: expected - consumed,
        }
        .into());
    }
    if consumed > expected {
        warn!(
            surplus = consumed - expected,
            nnz = header.nnz,
            "Body holds more records than the header declares"
        );
    }
    Ok(position)
}

fn check_supported(header: &MatrixMarketHeader, options: &ReadOptions) -> Result<()> {
    let generalize = options.generalize_symmetry && header.symmetry != SymmetryType::General;

    if generalize && header.object == ObjectType::Vector {
        return Err(
            MtxError::NotImplemented("Non-general symmetry for vectors not implemented.").into(),
        );
    }
    if header.format == FormatType::Array {
        if generalize {
            return Err(MtxError::NotImplemented(
                "Non-general symmetry for array matrices not implemented.",
            )
            .into());
        }
        if header.field == FieldType::Pattern {
            return Err(MtxError::NotImplemented("Pattern arrays not implemented.").into());
        }
    }
    Ok(())
}

fn read_chunks<R: BufRead, H: Handler>(
    mut chunks: ChunkReader<R>,
    header: &MatrixMarketHeader,
    handler: &mut H,
    options: &ReadOptions,
) -> Result<BodyPosition> {
    let mut position = BodyPosition::start(header);

    while let Some(chunk) = chunks.next_chunk()? {
        trace!(
            bytes = chunk.len(),
            first_line = position.line_num + 1,
            "Parsing chunk"
        );
        parse_chunk(
            chunk.as_bytes(),
            header,
            &mut position,
            handler,
            options.generalize_symmetry,
        )?;
    }
    Ok(position)
}

type Partial<V> = std::result::Result<(Vec<(usize, usize, V)>, BodyPosition), MtxError>;

/// Tokenize batches of chunks on a thread pool
///
/// Each chunk's starting line and array cursor follow from the line counts
/// of the chunks before it. Workers fill private buffers which are replayed
/// into `handler` in chunk order.
fn read_chunks_parallel<R: BufRead, H: Handler>(
    mut chunks: ChunkReader<R>,
    header: &MatrixMarketHeader,
    handler: &mut H,
    options: &ReadOptions,
) -> Result<BodyPosition> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(options.num_threads)
        .build()?;
    let generalize = options.generalize_symmetry;

    let mut position = BodyPosition::start(header);
    let mut records = 0i64;

    loop {
        let batch: Vec<Chunk> = chunks.next_batch(options.batch_size())?;
        if batch.is_empty() {
            break;
        }

        let mut starts = Vec::with_capacity(batch.len());
        for chunk in &batch {
            starts.push(BodyPosition::at_record(header, records));
            records = records.saturating_add(chunk.line_count());
        }
        trace!(chunks = batch.len(), records, "Parsing chunk batch");

        let partials: Vec<Partial<H::Value>> = pool.install(|| {
            batch
                .par_iter()
                .zip(starts.par_iter())
                .map(|(chunk, start)| -> Partial<H::Value> {
                    let mut local = *start;
                    let mut entries: Vec<(usize, usize, H::Value)> = Vec::new();
                    parse_chunk(chunk.as_bytes(), header, &mut local, &mut entries, generalize)?;
                    Ok((entries, local))
                })
                .collect()
        });

        for partial in partials {
            let (entries, end) = partial?;
            for (row, col, value) in entries {
                handler.handle(row, col, value);
            }
            position = end;
        }
    }
    Ok(position)
}
