//! Handler adapters reconciling the file's field with the handler's value type
//!
//! The tokenizers always parse the value type of the handler they are given.
//! Wrapping the caller's handler in an adapter changes that type:
//!
//! - [`PatternAdapter`] parses nothing and forwards a fixed substitute.
//! - [`ComplexAdapter`] parses a real scalar and forwards `complex(real, 0)`.
//!
//! [`select_adaptation`] is the single decision table choosing the wrapping.

use crate::error::{MtxError, Result};
use crate::format::FieldType;
use crate::traits::{Handler, MatrixValue, Pattern, ValueKind};

/// Value forwarded for every record of a pattern file
///
/// Avoid zero: downstream sparse structures typically drop explicit zeros,
/// which would discard the pattern.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternSubstitute<V: MatrixValue> {
    /// Forward this value unchanged
    Value(V),
    /// Forward this real scalar through complex promotion
    Real(V::Real),
}

impl<V: MatrixValue> PatternSubstitute<V> {
    /// Substitute in the handler's own value type
    pub fn into_value(self) -> V {
        match self {
            PatternSubstitute::Value(value) => value,
            PatternSubstitute::Real(real) => V::from_real(real),
        }
    }

    fn form(&self) -> SubstituteForm {
        match self {
            PatternSubstitute::Value(_) => SubstituteForm::Value,
            PatternSubstitute::Real(_) => SubstituteForm::Real,
        }
    }
}

impl<V: MatrixValue> Default for PatternSubstitute<V> {
    fn default() -> Self {
        PatternSubstitute::Value(V::one())
    }
}

/// Shape of the caller's pattern substitute
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubstituteForm {
    Value,
    Real,
}

/// Adapter stack placed in front of the caller's handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Adaptation {
    /// Handler consumes the file's values as they are
    Direct,
    /// Pattern file, substitute forwarded directly
    Pattern,
    /// Real or integer file read into complex values
    ComplexPromotion,
    /// Pattern file, real substitute promoted to complex
    PatternThenComplex,
}

/// Decide how to adapt a file `field` to a handler of `kind`
pub fn select_adaptation(
    field: FieldType,
    kind: ValueKind,
    substitute: SubstituteForm,
) -> Result<Adaptation> {
    let adaptation = match (field, kind) {
        (FieldType::Pattern, ValueKind::Complex) if substitute == SubstituteForm::Real => {
            Adaptation::PatternThenComplex
        }
        (FieldType::Pattern, _) => Adaptation::Pattern,
        (FieldType::Complex, ValueKind::Complex) => Adaptation::Direct,
        (FieldType::Complex, _) => return Err(MtxError::ComplexIncompatible),
        (FieldType::Real | FieldType::Double | FieldType::Integer, ValueKind::Complex) => {
            Adaptation::ComplexPromotion
        }
        (FieldType::Real | FieldType::Double | FieldType::Integer, _) => Adaptation::Direct,
    };
    Ok(adaptation)
}

/// Shorthand for [`select_adaptation`] with the handler's value type
pub fn adaptation_for<V: MatrixValue>(
    field: FieldType,
    substitute: &PatternSubstitute<V>,
) -> Result<Adaptation> {
    select_adaptation(field, V::KIND, substitute.form())
}

/// Forwards a fixed value for every pattern record
pub struct PatternAdapter<H: Handler> {
    inner: H,
    substitute: H::Value,
}

impl<H: Handler> PatternAdapter<H> {
    pub fn new(inner: H, substitute: H::Value) -> Self {
        Self { inner, substitute }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: Handler> Handler for PatternAdapter<H> {
    type Value = Pattern;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, _value: Pattern) {
        self.inner.handle(row, col, self.substitute);
    }
}

/// Promotes real values to the complex type of the wrapped handler
pub struct ComplexAdapter<H: Handler> {
    inner: H,
}

impl<H: Handler> ComplexAdapter<H> {
    pub fn new(inner: H) -> Self {
        Self { inner }
    }

    pub fn into_inner(self) -> H {
        self.inner
    }
}

impl<H: Handler> Handler for ComplexAdapter<H> {
    type Value = <H::Value as MatrixValue>::Real;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, value: Self::Value) {
        self.inner
            .handle(row, col, <H::Value as MatrixValue>::from_real(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use alloc::vec::Vec;
    use num_complex::Complex;

    #[test]
    fn test_decision_table() {
        use FieldType as F;
        use SubstituteForm::{Real as R, Value as V};

        let cases = [
            (F::Real, ValueKind::Real, V, Ok(Adaptation::Direct)),
            (F::Integer, ValueKind::Integer, V, Ok(Adaptation::Direct)),
            (F::Double, ValueKind::Complex, V, Ok(Adaptation::ComplexPromotion)),
            (F::Integer, ValueKind::Complex, R, Ok(Adaptation::ComplexPromotion)),
            (F::Complex, ValueKind::Complex, V, Ok(Adaptation::Direct)),
            (F::Complex, ValueKind::Real, V, Err(MtxError::ComplexIncompatible)),
            (F::Complex, ValueKind::Integer, V, Err(MtxError::ComplexIncompatible)),
            (F::Pattern, ValueKind::Real, V, Ok(Adaptation::Pattern)),
            (F::Pattern, ValueKind::Complex, V, Ok(Adaptation::Pattern)),
            (F::Pattern, ValueKind::Complex, R, Ok(Adaptation::PatternThenComplex)),
        ];

        for (field, kind, form, expected) in cases {
            assert_eq!(select_adaptation(field, kind, form), expected, "{field} {kind:?}");
        }
    }

    #[test]
    fn test_pattern_adapter_forwards_substitute() {
        let mut out: Vec<(usize, usize, f64)> = Vec::new();
        let mut adapter = PatternAdapter::new(&mut out, 1.0);
        adapter.handle(1, 2, Pattern);
        assert_eq!(out, vec![(1, 2, 1.0)]);
    }

    #[test]
    fn test_complex_adapter_promotes() {
        let mut out: Vec<(usize, usize, Complex<f64>)> = Vec::new();
        let mut adapter = ComplexAdapter::new(&mut out);
        adapter.handle(0, 3, 3.5);
        assert_eq!(out, vec![(0, 3, Complex::new(3.5, 0.0))]);
    }

    #[test]
    fn test_pattern_then_complex() {
        let mut out: Vec<(usize, usize, Complex<f32>)> = Vec::new();
        let substitute = PatternSubstitute::<Complex<f32>>::Real(2.0);
        assert_eq!(
            adaptation_for(FieldType::Pattern, &substitute),
            Ok(Adaptation::PatternThenComplex)
        );

        let PatternSubstitute::Real(real) = substitute else {
            unreachable!()
        };
        let mut adapter = PatternAdapter::new(ComplexAdapter::new(&mut out), real);
        adapter.handle(4, 4, Pattern);
        assert_eq!(out, vec![(4, 4, Complex::new(2.0, 0.0))]);
    }

    #[test]
    fn test_substitute_into_value() {
        assert_eq!(PatternSubstitute::<f64>::default().into_value(), 1.0);
        assert_eq!(
            PatternSubstitute::<Complex<f64>>::Real(5.0).into_value(),
            Complex::new(5.0, 0.0)
        );
    }
}
