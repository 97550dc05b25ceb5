//! Error types for the price service client

use thiserror::Error;

/// Errors produced by the price service client.
///
/// Lookup misses (unknown symbol, unknown asset id) are not errors; those
/// surface as `None` from the relevant call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Remote unreachable, timed out, or returned a non-2xx status.
    #[error("price service request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Response arrived but did not match the expected shape.
    #[error("malformed price service response: {0}")]
    Data(String),
}

pub type ApiResult<T> = Result<T, ApiError>;
