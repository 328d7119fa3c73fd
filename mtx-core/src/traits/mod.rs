//! Abstract interfaces for the Matrix Market codec
//!
//! Traits are pure interfaces plus their implementations for the
//! standard value types.

pub mod element;
pub mod handler;

pub use element::{MatrixValue, Pattern, ValueKind};
pub use handler::Handler;
