//! Value types that can flow through a Matrix Market body
//!
//! This module defines the trait that constrains what types can be read
//! from or written to a body record, and the [`Pattern`] placeholder used
//! for structure-only files.

use core::fmt::Write;

use num_complex::Complex;

use crate::format::FieldType;
use crate::validation::{ChunkCursor, ScanError};

/// Broad category of a value type, used to pick type adaptations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Integer,
    Real,
    Complex,
    /// No value at all
    Pattern,
}

/// Trait for types that can be stored as matrix values
///
/// All value types must be:
/// - Copy: records are passed by value to handlers
/// - Send + Sync: chunks may be tokenized on worker threads
pub trait MatrixValue: Copy + PartialEq + core::fmt::Debug + Send + Sync + 'static {
    /// Category of this value type
    const KIND: ValueKind;

    /// Field written to the banner for this value type
    const FIELD: FieldType;

    /// Scalar a real-valued file provides for this type.
    ///
    /// `Self` for real and integer types, the component type for complex ones.
    type Real: MatrixValue;

    /// Read this value's tokens from the current record
    fn read(cursor: &mut ChunkCursor<'_>) -> Result<Self, ScanError>;

    /// Write this value's tokens, without surrounding whitespace
    fn write_value<W: Write>(&self, out: &mut W) -> core::fmt::Result;

    /// Promote a real scalar to this type
    fn from_real(real: Self::Real) -> Self;

    /// The multiplicative identity, a sensible pattern substitute
    fn one() -> Self;

    /// Fill value of dense storage
    fn zero() -> Self;

    /// Mirrored value of a skew-symmetric entry
    fn negate(self) -> Self;

    /// Mirrored value of a Hermitian entry
    fn conjugate(self) -> Self;
}

/// Placeholder value of pattern records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct Pattern;

impl MatrixValue for Pattern {
    const KIND: ValueKind = ValueKind::Pattern;
    const FIELD: FieldType = FieldType::Pattern;
    type Real = Pattern;

    fn read(_cursor: &mut ChunkCursor<'_>) -> Result<Self, ScanError> {
        Ok(Pattern)
    }

    fn write_value<W: Write>(&self, _out: &mut W) -> core::fmt::Result {
        Ok(())
    }

    fn from_real(real: Self::Real) -> Self {
        real
    }

    fn one() -> Self {
        Pattern
    }

    fn zero() -> Self {
        Pattern
    }

    fn negate(self) -> Self {
        self
    }

    fn conjugate(self) -> Self {
        self
    }
}

macro_rules! integer_value {
    ($($ty:ty),*) => {$(
        impl MatrixValue for $ty {
            const KIND: ValueKind = ValueKind::Integer;
            const FIELD: FieldType = FieldType::Integer;
            type Real = $ty;

            fn read(cursor: &mut ChunkCursor<'_>) -> Result<Self, ScanError> {
                let value = cursor.read_int()?;
                <$ty>::try_from(value).map_err(|_| ScanError::Overflow)
            }

            fn write_value<W: Write>(&self, out: &mut W) -> core::fmt::Result {
                write!(out, "{self}")
            }

            fn from_real(real: Self::Real) -> Self {
                real
            }

            fn one() -> Self {
                1
            }

            fn zero() -> Self {
                0
            }

            fn negate(self) -> Self {
                self.wrapping_neg()
            }

            fn conjugate(self) -> Self {
                self
            }
        }
    )*};
}

macro_rules! real_value {
    ($($ty:ty),*) => {$(
        impl MatrixValue for $ty {
            const KIND: ValueKind = ValueKind::Real;
            const FIELD: FieldType = FieldType::Real;
            type Real = $ty;

            fn read(cursor: &mut ChunkCursor<'_>) -> Result<Self, ScanError> {
                cursor.read_float()
            }

            // Debug formatting is the shortest text that parses back exactly
            fn write_value<W: Write>(&self, out: &mut W) -> core::fmt::Result {
                write!(out, "{self:?}")
            }

            fn from_real(real: Self::Real) -> Self {
                real
            }

            fn one() -> Self {
                1.0
            }

            fn zero() -> Self {
                0.0
            }

            fn negate(self) -> Self {
                -self
            }

            fn conjugate(self) -> Self {
                self
            }
        }

        impl MatrixValue for Complex<$ty> {
            const KIND: ValueKind = ValueKind::Complex;
            const FIELD: FieldType = FieldType::Complex;
            type Real = $ty;

            fn read(cursor: &mut ChunkCursor<'_>) -> Result<Self, ScanError> {
                let (re, im) = cursor.read_complex()?;
                Ok(Complex::new(re, im))
            }

            fn write_value<W: Write>(&self, out: &mut W) -> core::fmt::Result {
                write!(out, "{:?} {:?}", self.re, self.im)
            }

            fn from_real(real: Self::Real) -> Self {
                Complex::new(real, 0.0)
            }

            fn one() -> Self {
                Complex::new(1.0, 0.0)
            }

            fn zero() -> Self {
                Complex::new(0.0, 0.0)
            }

            fn negate(self) -> Self {
                -self
            }

            fn conjugate(self) -> Self {
                self.conj()
            }
        }
    )*};
}

integer_value!(i32, i64);
real_value!(f32, f64);
