use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for palette operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors reported by the palette pipeline.
///
/// Every failure aborts the operation that produced it; no partial results are
/// returned.
#[derive(Error, Debug)]
pub enum Error {
    /// A sticker image could not be read or decoded.
    #[error("failed to load image {path}: {source}")]
    ImageLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Too few colors remain in the pool to satisfy the requested operation.
    #[error("insufficient color data: have {available}, need {needed}")]
    InsufficientData { available: usize, needed: usize },

    /// An out-of-range or non-positive parameter, rejected before any
    /// computation runs.
    #[error("invalid parameter: {parameter} = {value}")]
    InvalidParameter {
        parameter: &'static str,
        value: String,
    },
}

impl Error {
    pub(crate) fn invalid_parameter(parameter: &'static str, value: impl ToString) -> Self {
        Self::InvalidParameter {
            parameter,
            value: value.to_string(),
        }
    }
}
