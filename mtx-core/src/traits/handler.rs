//! Record sink abstraction
//!
//! A [`Handler`] receives every decoded body record. Implementations decide
//! how to store them; the tokenizers only promise one call per physical
//! record, plus one mirrored call for off-diagonal entries when symmetry is
//! being generalized.

use alloc::vec::Vec;

use super::element::MatrixValue;

/// Sink for decoded `(row, col, value)` records
pub trait Handler {
    /// Value type the handler stores
    type Value: MatrixValue;

    /// Accept one record. `row` and `col` are zero-based.
    fn handle(&mut self, row: usize, col: usize, value: Self::Value);
}

impl<H: Handler + ?Sized> Handler for &mut H {
    type Value = H::Value;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, value: Self::Value) {
        (**self).handle(row, col, value);
    }
}

/// Plain triplet buffer; also the private partial result of a worker
impl<V: MatrixValue> Handler for Vec<(usize, usize, V)> {
    type Value = V;

    #[inline]
    fn handle(&mut self, row: usize, col: usize, value: V) {
        self.push((row, col, value));
    }
}
