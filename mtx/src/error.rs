//! Error handling for Matrix Market stream operations.
//!
//! Wraps the format errors of `mtx-core` together with the I/O and
//! threading failures that only occur once streams are involved.

use mtx_core::MtxError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Format(#[from] MtxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to build parser thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Failed to format value: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl Error {
    /// Create an invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// The format error, if this is one
    pub fn as_format(&self) -> Option<&MtxError> {
        match self {
            Error::Format(err) => Some(err),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
