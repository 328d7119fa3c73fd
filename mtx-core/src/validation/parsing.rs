//! Bounds-checked scanning over chunk bytes
//!
//! [`ChunkCursor`] walks a chunk by index. Every advance reports running out
//! of input explicitly instead of comparing positions against an end marker.
//! The numeric primitives turn one whitespace-delimited token into a value.

use core::str::FromStr;

/// Failure signal of the token primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanError {
    /// The line ended before the expected token
    MissingToken,
    /// The token is not a valid number of the requested kind
    InvalidNumber,
    /// The integer does not fit the target type
    Overflow,
}

impl core::fmt::Display for ScanError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            ScanError::MissingToken => "Missing value",
            ScanError::InvalidNumber => "Invalid number",
            ScanError::Overflow => "Number out of range",
        };
        write!(f, "{msg}")
    }
}

#[inline]
const fn is_blank(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\r')
}

#[inline]
const fn is_delimiter(byte: u8) -> bool {
    is_blank(byte) || byte == b'\n'
}

/// Read position inside a chunk buffer
#[derive(Debug, Clone)]
pub struct ChunkCursor<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkCursor<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current byte offset into the chunk
    pub fn position(&self) -> usize {
        self.pos
    }

    /// True once every byte has been consumed
    pub fn is_at_end(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Bytes not yet consumed
    pub fn remaining(&self) -> &'a [u8] {
        self.data.get(self.pos..).unwrap_or(&[])
    }

    /// Skip spaces, tabs and carriage returns but not newlines
    pub fn skip_spaces(&mut self) {
        while let Some(&byte) = self.data.get(self.pos) {
            if !is_blank(byte) {
                break;
            }
            self.pos += 1;
        }
    }

    /// Take the next whitespace-delimited token on the current line
    ///
    /// Returns `None` if the line (or the input) ends first.
    pub fn next_token(&mut self) -> Option<&'a [u8]> {
        self.skip_spaces();
        let start = self.pos;
        while let Some(&byte) = self.data.get(self.pos) {
            if is_delimiter(byte) {
                break;
            }
            self.pos += 1;
        }

        if self.pos == start {
            None
        } else {
            self.data.get(start..self.pos)
        }
    }

    /// Move past the next newline
    ///
    /// Returns `false` if the input ended without another line.
    pub fn bump_to_next_line(&mut self) -> bool {
        match self.remaining().iter().position(|&byte| byte == b'\n') {
            Some(offset) => {
                self.pos += offset + 1;
                !self.is_at_end()
            }
            None => {
                self.pos = self.data.len();
                false
            }
        }
    }

    /// Read the next token as a signed integer
    pub fn read_int(&mut self) -> Result<i64, ScanError> {
        self.next_token()
            .ok_or(ScanError::MissingToken)
            .and_then(parse_int)
    }

    /// Read the next token as a floating point value
    pub fn read_float<T: FromStr>(&mut self) -> Result<T, ScanError> {
        self.next_token()
            .ok_or(ScanError::MissingToken)
            .and_then(parse_float)
    }

    /// Read two consecutive tokens as the real and imaginary parts
    pub fn read_complex<T: FromStr>(&mut self) -> Result<(T, T), ScanError> {
        let re = self.next_token().ok_or(ScanError::MissingToken)?;
        let im = self.next_token().ok_or(ScanError::MissingToken)?;
        parse_complex(re, im)
    }
}

/// Parse a decimal integer with an optional sign
pub fn parse_int(token: &[u8]) -> Result<i64, ScanError> {
    let (negative, digits) = match token.split_first() {
        Some((b'-', rest)) => (true, rest),
        Some((b'+', rest)) => (false, rest),
        _ => (false, token),
    };

    if digits.is_empty() {
        return Err(ScanError::InvalidNumber);
    }

    let mut result: i64 = 0;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return Err(ScanError::InvalidNumber);
        }

        let digit = i64::from(byte - b'0');
        result = result
            .checked_mul(10)
            .and_then(|value| {
                if negative {
                    value.checked_sub(digit)
                } else {
                    value.checked_add(digit)
                }
            })
            .ok_or(ScanError::Overflow)?;
    }

    Ok(result)
}

/// Parse a floating point token (`1`, `-2.5e3`, `inf`, `nan`, ...)
pub fn parse_float<T: FromStr>(token: &[u8]) -> Result<T, ScanError> {
    let text = core::str::from_utf8(token).map_err(|_| ScanError::InvalidNumber)?;
    text.parse::<T>().map_err(|_| ScanError::InvalidNumber)
}

/// Parse a real and an imaginary token
pub fn parse_complex<T: FromStr>(re: &[u8], im: &[u8]) -> Result<(T, T), ScanError> {
    Ok((parse_float(re)?, parse_float(im)?))
}
