//! Matrix Market header model and line-level codec
//!
//! The header is the banner line, any number of `%` comment lines and the
//! dimension line. This module parses and formats those lines; pulling the
//! lines off a stream is left to the I/O layer.

use alloc::string::String;
use core::fmt::Write;

use super::constants::{BANNER, BANNER_LENIENT, COMMENT_MARKER};
use crate::error::{MtxError, Result};

/// Kind of object stored in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ObjectType {
    Matrix,
    Vector,
}

/// Body layout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FormatType {
    /// Dense, column-major values with implicit positions
    Array,
    /// Sparse triplets
    Coordinate,
}

/// Declared value type of the body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FieldType {
    Real,
    Double,
    Complex,
    Integer,
    /// Structure only, records carry no value tokens
    Pattern,
}

/// Declared symmetry of a matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SymmetryType {
    General,
    Symmetric,
    SkewSymmetric,
    Hermitian,
}

const OBJECT_NAMES: [(ObjectType, &str); 2] =
    [(ObjectType::Matrix, "matrix"), (ObjectType::Vector, "vector")];

const FORMAT_NAMES: [(FormatType, &str); 2] = [
    (FormatType::Array, "array"),
    (FormatType::Coordinate, "coordinate"),
];

const FIELD_NAMES: [(FieldType, &str); 5] = [
    (FieldType::Real, "real"),
    (FieldType::Double, "double"),
    (FieldType::Complex, "complex"),
    (FieldType::Integer, "integer"),
    (FieldType::Pattern, "pattern"),
];

const SYMMETRY_NAMES: [(SymmetryType, &str); 4] = [
    (SymmetryType::General, "general"),
    (SymmetryType::Symmetric, "symmetric"),
    (SymmetryType::SkewSymmetric, "skew_symmetric"),
    (SymmetryType::Hermitian, "hermitian"),
];

/// Spellings accepted on read but never written
const SYMMETRY_ALIASES: [(SymmetryType, &str); 1] =
    [(SymmetryType::SkewSymmetric, "skew-symmetric")];

/// Case-insensitive lookup of a banner token in a name table
fn lookup<E: Copy>(table: &[(E, &'static str)], token: &str) -> Option<E> {
    table
        .iter()
        .find(|(_, name)| name.eq_ignore_ascii_case(token))
        .map(|(value, _)| *value)
}

fn name_of<E: Copy + PartialEq>(table: &[(E, &'static str)], value: E) -> &'static str {
    table
        .iter()
        .find(|(candidate, _)| *candidate == value)
        .map(|(_, name)| *name)
        .unwrap_or("")
}

macro_rules! banner_token {
    ($ty:ty, $table:ident) => {
        banner_token!($ty, $table, []);
    };
    ($ty:ty, $table:ident, [$($aliases:ident),*]) => {
        impl $ty {
            /// Parse a banner token, ignoring ASCII case
            pub fn parse(token: &str) -> Option<Self> {
                lookup(&$table, token)$(.or_else(|| lookup(&$aliases, token)))*
            }

            /// Canonical lowercase spelling used when writing
            pub fn as_str(self) -> &'static str {
                name_of(&$table, self)
            }
        }

        impl core::fmt::Display for $ty {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

banner_token!(ObjectType, OBJECT_NAMES);
banner_token!(FormatType, FORMAT_NAMES);
banner_token!(FieldType, FIELD_NAMES);
banner_token!(SymmetryType, SYMMETRY_NAMES, [SYMMETRY_ALIASES]);

fn parse_header_token<E>(token: &str, parse: fn(&str) -> Option<E>, line: i64) -> Result<E> {
    parse(token).ok_or_else(|| {
        let mut reason = String::from("Invalid MatrixMarket header: ");
        reason.push_str(token);
        MtxError::malformed_header(line, reason)
    })
}

/// Parsed Matrix Market header
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MatrixMarketHeader {
    pub object: ObjectType,
    pub format: FormatType,
    pub field: FieldType,
    pub symmetry: SymmetryType,
    /// Number of rows (vector length for vectors)
    pub nrows: i64,
    /// Number of columns (1 for vectors)
    pub ncols: i64,
    /// Vector length, -1 for matrices once read
    pub vector_length: i64,
    /// Number of body records; derived for array format
    pub nnz: i64,
    /// Comment block, one entry per line joined by `\n`, markers stripped
    pub comment: String,
    /// Lines taken by banner, comments and dimension line. Set by the reader.
    pub header_line_count: i64,
}

impl MatrixMarketHeader {
    /// Create a general real coordinate matrix header
    pub fn new(nrows: i64, ncols: i64) -> Self {
        Self {
            nrows,
            ncols,
            ..Self::default()
        }
    }

    /// Create a general real coordinate vector header
    pub fn vector(length: i64) -> Self {
        Self {
            object: ObjectType::Vector,
            nrows: length,
            ncols: 1,
            vector_length: length,
            ..Self::default()
        }
    }

    /// Set the comment block
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = comment.into();
        self
    }

    /// Set the symmetry
    pub fn with_symmetry(mut self, symmetry: SymmetryType) -> Self {
        self.symmetry = symmetry;
        self
    }

    /// Set the field
    pub fn with_field(mut self, field: FieldType) -> Self {
        self.field = field;
        self
    }

    /// Line count the body must reach for the file to be complete
    pub fn expected_line_count(&self) -> i64 {
        self.header_line_count.saturating_add(self.nnz)
    }

    /// Parse the banner line into object, format, field and symmetry
    pub fn parse_banner(&mut self, line: &str, line_num: i64) -> Result<()> {
        if !line.starts_with(BANNER) && !line.starts_with(BANNER_LENIENT) {
            return Err(MtxError::malformed_header(
                line_num,
                "Not a Matrix Market file. Missing banner.",
            ));
        }

        let mut tokens = line.split_whitespace().skip(1);
        let mut next = || tokens.next().unwrap_or("");

        self.object = parse_header_token(next(), ObjectType::parse, line_num)?;
        self.format = parse_header_token(next(), FormatType::parse, line_num)?;
        self.field = parse_header_token(next(), FieldType::parse, line_num)?;
        self.symmetry = parse_header_token(next(), SymmetryType::parse, line_num)?;
        Ok(())
    }

    /// Append a comment line to the comment block
    ///
    /// Returns `false` without touching the header if the line is not a comment.
    pub fn read_comment(&mut self, line: &str) -> bool {
        let Some(body) = line.strip_prefix(COMMENT_MARKER) else {
            return false;
        };

        if !self.comment.is_empty() {
            self.comment.push('\n');
        }
        self.comment.push_str(body);
        true
    }

    /// Parse the dimension line and derive the dependent sizes
    pub fn parse_dimension_line(&mut self, line: &str, line_num: i64) -> Result<()> {
        let mut tokens = line.split_whitespace();
        let mut next_size = |what: &str| -> Result<i64> {
            let token = tokens.next().unwrap_or("");
            token.parse::<i64>().map_err(|_| {
                let mut reason = String::new();
                let _ = write!(reason, "Invalid {what} in dimension line: '{token}'");
                MtxError::malformed_header(line_num, reason)
            })
        };

        match self.object {
            ObjectType::Vector => {
                self.vector_length = next_size("vector length")?;
                if self.vector_length < 0 {
                    return Err(MtxError::malformed_header(
                        line_num,
                        "Vector length can't be negative.",
                    ));
                }

                self.nnz = match self.format {
                    FormatType::Coordinate => next_size("nnz")?,
                    FormatType::Array => self.vector_length,
                };

                self.nrows = self.vector_length;
                self.ncols = 1;
            }
            ObjectType::Matrix => {
                self.nrows = next_size("row count")?;
                self.ncols = next_size("column count")?;
                if self.nrows < 0 || self.ncols < 0 {
                    return Err(MtxError::malformed_header(
                        line_num,
                        "Matrix dimensions can't be negative.",
                    ));
                }

                self.nnz = match self.format {
                    FormatType::Coordinate => next_size("nnz")?,
                    FormatType::Array => self.nrows.checked_mul(self.ncols).ok_or_else(|| {
                        MtxError::malformed_header(line_num, "Matrix dimensions overflow.")
                    })?,
                };
                self.vector_length = -1;
            }
        }

        if self.nnz < 0 {
            return Err(MtxError::malformed_header(
                line_num,
                "Number of entries can't be negative.",
            ));
        }
        Ok(())
    }

    /// Format the header as Matrix Market text
    ///
    /// `nnz` is emitted only for coordinate bodies.
    pub fn write_text<W: Write>(&self, out: &mut W) -> core::fmt::Result {
        writeln!(
            out,
            "{BANNER} {} {} {} {}",
            self.object, self.format, self.field, self.symmetry
        )?;

        for line in self.comment.lines() {
            writeln!(out, "{COMMENT_MARKER}{line}")?;
        }

        match self.object {
            ObjectType::Vector => write!(out, "{}", self.vector_length)?,
            ObjectType::Matrix => write!(out, "{} {}", self.nrows, self.ncols)?,
        }
        if self.format == FormatType::Coordinate {
            write!(out, " {}", self.nnz)?;
        }
        out.write_char('\n')
    }
}

impl Default for MatrixMarketHeader {
    fn default() -> Self {
        Self {
            object: ObjectType::Matrix,
            format: FormatType::Coordinate,
            field: FieldType::Real,
            symmetry: SymmetryType::General,
            nrows: 0,
            ncols: 0,
            vector_length: 0,
            nnz: 0,
            comment: String::new(),
            header_line_count: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Banner,
    CommentsOrDimensions,
    Done,
}

/// Line-at-a-time header parser
///
/// Feed lines (without their terminator) until [`HeaderParser::feed`] returns
/// `true`; the header is then complete and `header_line_count` is set.
#[derive(Debug, Clone)]
pub struct HeaderParser {
    header: MatrixMarketHeader,
    state: ParserState,
    lines_read: i64,
}

impl HeaderParser {
    pub fn new() -> Self {
        Self {
            header: MatrixMarketHeader::default(),
            state: ParserState::Banner,
            lines_read: 0,
        }
    }

    /// Number of lines consumed so far
    pub fn lines_read(&self) -> i64 {
        self.lines_read
    }

    /// Consume one header line. Returns `true` once the dimension line is parsed.
    pub fn feed(&mut self, line: &str) -> Result<bool> {
        self.lines_read += 1;
        let line_num = self.lines_read;

        match self.state {
            ParserState::Banner => {
                self.header.parse_banner(line, line_num)?;
                self.state = ParserState::CommentsOrDimensions;
                Ok(false)
            }
            ParserState::CommentsOrDimensions => {
                if self.header.read_comment(line) || line.trim().is_empty() {
                    return Ok(false);
                }
                self.header.parse_dimension_line(line, line_num)?;
                self.header.header_line_count = line_num;
                self.state = ParserState::Done;
                Ok(true)
            }
            ParserState::Done => Ok(true),
        }
    }

    /// Signal end of input
    pub fn finish(self) -> Result<MatrixMarketHeader> {
        if self.state == ParserState::Done {
            Ok(self.header)
        } else {
            Err(MtxError::malformed_header(
                self.lines_read + 1,
                "Invalid MatrixMarket header: Premature EOF",
            ))
        }
    }
}

impl Default for HeaderParser {
    fn default() -> Self {
        Self::new()
    }
}
