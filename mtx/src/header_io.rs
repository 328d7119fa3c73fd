//! Header reading and writing over streams

use std::io::{BufRead, Write};

use mtx_core::{HeaderParser, MatrixMarketHeader};
use tracing::debug;

use crate::error::Result;

/// Read the header, leaving the stream positioned at the first body line
///
/// `header_line_count` on the result holds the number of lines consumed.
pub fn read_header<R: BufRead>(reader: &mut R) -> Result<MatrixMarketHeader> {
    let mut parser = HeaderParser::new();
    let mut line = Vec::new();

    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            // Reports premature EOF
            return Ok(parser.finish()?);
        }

        while matches!(line.last(), Some(b'\n' | b'\r')) {
            line.pop();
        }
        if parser.feed(&String::from_utf8_lossy(&line))? {
            break;
        }
    }

    let header = parser.finish()?;
    debug!(
        object = %header.object,
        format = %header.format,
        field = %header.field,
        symmetry = %header.symmetry,
        nrows = header.nrows,
        ncols = header.ncols,
        nnz = header.nnz,
        header_lines = header.header_line_count,
        "Read Matrix Market header"
    );
    Ok(header)
}

/// Write the banner, comment block and dimension line
pub fn write_header<W: Write>(writer: &mut W, header: &MatrixMarketHeader) -> Result<()> {
    let mut text = String::new();
    header.write_text(&mut text)?;
    writer.write_all(text.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mtx_core::{FieldType, FormatType, MtxError, ObjectType, SymmetryType};
    use std::io::{BufReader, Cursor, Read};

    #[test]
    fn test_read_header_stops_at_body() {
        let text = "%%MatrixMarket matrix coordinate real symmetric\n% a comment\n%\n3 3 2\n1 1 1\n";
        let mut reader = Cursor::new(text.as_bytes());

        let header = read_header(&mut reader).unwrap();
        assert_eq!(header.symmetry, SymmetryType::Symmetric);
        assert_eq!(header.comment, " a comment\n");
        assert_eq!((header.nrows, header.ncols, header.nnz), (3, 3, 2));
        assert_eq!(header.header_line_count, 4);

        let mut rest = String::new();
        reader.read_to_string(&mut rest).unwrap();
        assert_eq!(rest, "1 1 1\n");
    }

    #[test]
    fn test_crlf_header() {
        let text = "%%MatrixMarket vector array integer general\r\n4\r\n";
        let header = read_header(&mut BufReader::new(text.as_bytes())).unwrap();
        assert_eq!(header.object, ObjectType::Vector);
        assert_eq!(header.format, FormatType::Array);
        assert_eq!(header.field, FieldType::Integer);
        assert_eq!((header.vector_length, header.nnz), (4, 4));
    }

    #[test]
    fn test_premature_eof() {
        let text = "%%MatrixMarket matrix coordinate real general\n% only comments\n";
        let err = read_header(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(MtxError::MalformedHeader { line: 3, .. })
        ));
    }

    #[test]
    fn test_missing_banner() {
        let err = read_header(&mut "3 3 1\n".as_bytes()).unwrap_err();
        assert!(matches!(
            err.as_format(),
            Some(MtxError::MalformedHeader { line: 1, .. })
        ));
    }

    #[test]
    fn test_header_round_trip() {
        let header = MatrixMarketHeader::new(5, 7)
            .with_field(FieldType::Complex)
            .with_symmetry(SymmetryType::Hermitian)
            .with_comment("first\nsecond");

        let mut out = Vec::new();
        write_header(&mut out, &header).unwrap();
        assert_eq!(
            String::from_utf8(out.clone()).unwrap(),
            "%%MatrixMarket matrix coordinate complex hermitian\n%first\n%second\n5 7 0\n"
        );

        let read = read_header(&mut out.as_slice()).unwrap();
        assert_eq!(read.comment, "first\nsecond");
        assert_eq!(read.field, FieldType::Complex);
        assert_eq!(read.header_line_count, 4);
    }
}
