//! Error types for upstream ranking API calls
//!
//! The cache core itself never fails: gets answer with an `Option`, sets and
//! sweeps are plain bookkeeping. This module defines the error surface of the
//! upstream collaborator seam instead, shared by every `RankingSource`
//! implementation. A failed fetch must not be written back to the cache; the
//! key simply stays a miss.

use std::time::Duration;

use thiserror::Error;

// == Fetch Error Enum ==
/// Unified error type for upstream fetch operations.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Upstream returned a non-success HTTP status
    #[error("upstream returned status {0}")]
    Status(u16),

    /// The request exceeded its deadline
    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    /// The response body could not be decoded
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The requested handle does not exist upstream
    #[error("unknown handle: {0}")]
    UnknownHandle(String),

    /// Transport-level failure (connect, DNS, TLS)
    #[error("transport error: {0}")]
    Transport(String),
}

impl FetchError {
    /// True when retrying the same request may succeed.
    ///
    /// Unknown handles and decode failures are deterministic and not worth
    /// retrying; rate limiting and server-side errors are.
    pub fn is_retryable(&self) -> bool {
        match self {
            FetchError::Timeout(_) | FetchError::Transport(_) => true,
            FetchError::Status(status) => *status == 429 || *status >= 500,
            FetchError::Decode(_) | FetchError::UnknownHandle(_) => false,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for upstream fetches.
pub type Result<T> = std::result::Result<T, FetchError>;
