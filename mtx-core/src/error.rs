//! Error types for Matrix Market operations

use alloc::string::String;

/// Errors that can occur while reading or writing Matrix Market data
///
/// Line numbers are 1-based physical lines of the file being read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MtxError {
    /// Missing or garbled banner, unknown header token, bad dimension line
    /// or end of input before the dimension line
    MalformedHeader { line: i64, reason: String },
    /// A body token failed to parse, or an array received too many values
    MalformedBody { line: i64, reason: String },
    /// A coordinate index lies outside the declared dimensions
    IndexOutOfBounds { line: i64, reason: &'static str },
    /// The body ended before the declared number of records
    TruncatedFile { missing: i64 },
    /// Valid Matrix Market that this codec does not handle
    NotImplemented(&'static str),
    /// The file is complex but the destination cannot hold complex values
    ComplexIncompatible,
}

impl MtxError {
    /// Create a malformed header error
    pub fn malformed_header(line: i64, reason: impl Into<String>) -> Self {
        Self::MalformedHeader {
            line,
            reason: reason.into(),
        }
    }

    /// Create a malformed body error
    pub fn malformed_body(line: i64, reason: impl Into<String>) -> Self {
        Self::MalformedBody {
            line,
            reason: reason.into(),
        }
    }

    /// Create an index out of bounds error
    pub const fn index_out_of_bounds(line: i64, reason: &'static str) -> Self {
        Self::IndexOutOfBounds { line, reason }
    }

    /// Line the error was raised on, if it is tied to one
    pub const fn line(&self) -> Option<i64> {
        match self {
            Self::MalformedHeader { line, .. }
            | Self::MalformedBody { line, .. }
            | Self::IndexOutOfBounds { line, .. } => Some(*line),
            Self::TruncatedFile { .. } | Self::NotImplemented(_) | Self::ComplexIncompatible => {
                None
            }
        }
    }
}

impl core::fmt::Display for MtxError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            MtxError::MalformedHeader { line, reason } => {
                write!(f, "Invalid Matrix Market header (line {line}): {reason}")
            }
            MtxError::MalformedBody { line, reason } => {
                write!(f, "Invalid Matrix Market body (line {line}): {reason}")
            }
            MtxError::IndexOutOfBounds { line, reason } => write!(f, "{reason} (line {line})"),
            MtxError::TruncatedFile { missing } => {
                write!(f, "Truncated file. Expected another {missing} lines.")
            }
            MtxError::NotImplemented(reason) => write!(f, "Not implemented: {reason}"),
            MtxError::ComplexIncompatible => write!(
                f,
                "Matrix Market file has complex fields but passed data structure cannot handle complex values."
            ),
        }
    }
}

impl core::error::Error for MtxError {}

/// Result type for Matrix Market operations
pub type Result<T> = core::result::Result<T, MtxError>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_display_carries_line() {
        let err = MtxError::index_out_of_bounds(7, "Row index out of bounds");
        assert_eq!(err.to_string(), "Row index out of bounds (line 7)");
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_truncated_message() {
        let err = MtxError::TruncatedFile { missing: 3 };
        assert_eq!(err.to_string(), "Truncated file. Expected another 3 lines.");
        assert_eq!(err.line(), None);
    }
}
