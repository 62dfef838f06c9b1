//! Error types and failure classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The error enum for every fetch operation
//! - [`FailureKind`]: Rate-limited vs. network-class failure

mod failure;

pub use failure::FailureKind;

use thiserror::Error;

/// Errors that can occur while talking to the market data API.
///
/// Each variant is classified into a [`FailureKind`] via
/// [`failure_kind`](Self::failure_kind). Callers are expected to degrade to
/// cached data for every variant; none of them is fatal.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The provider rate limited the request (HTTP 429).
    #[error("Rate limited: {provider}")]
    RateLimited {
        /// The provider that rate limited the request
        provider: String,
    },

    /// The provider answered with a non-success status other than 429.
    #[error("HTTP {status} from {provider}")]
    HttpStatus {
        /// The provider that returned the status
        provider: String,
        /// The HTTP status code
        status: u16,
    },

    /// The response body could not be decoded into the expected shape.
    #[error("Failed to decode {provider} response: {message}")]
    Decode {
        /// The provider whose payload was malformed
        provider: String,
        /// Decoder message
        message: String,
    },

    /// The request could not be built from the given parameters.
    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    /// A transport-level error (DNS, TLS, connection reset, timeout).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl MarketDataError {
    /// Returns the failure classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use nexora_market_data::errors::{FailureKind, MarketDataError};
    ///
    /// let error = MarketDataError::RateLimited { provider: "COINGECKO".to_string() };
    /// assert_eq!(error.failure_kind(), FailureKind::RateLimited);
    ///
    /// let error = MarketDataError::HttpStatus { provider: "COINGECKO".to_string(), status: 503 };
    /// assert_eq!(error.failure_kind(), FailureKind::NetworkError);
    /// ```
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            Self::RateLimited { .. } => FailureKind::RateLimited,
            Self::HttpStatus { .. }
            | Self::Decode { .. }
            | Self::InvalidQuery(_)
            | Self::Network(_) => FailureKind::NetworkError,
        }
    }

    pub fn is_rate_limited(&self) -> bool {
        self.failure_kind() == FailureKind::RateLimited
    }
}
