//! Error types for the market fetcher crate.

use thiserror::Error;

/// Errors that can occur while fetching upstream market data.
///
/// Each variant is classified by [`is_recoverable`](Self::is_recoverable),
/// which determines whether a failed cache refresh may fall back to a stale
/// entry or must propagate to the caller.
#[derive(Error, Debug)]
pub enum FetchError {
    /// A network-level error reaching the upstream (timeout, connection
    /// refused, DNS failure).
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The upstream responded with a non-success HTTP status.
    #[error("Upstream status failure: {provider} returned {status}")]
    UpstreamStatus {
        /// The provider that returned the status
        provider: &'static str,
        /// The HTTP status code
        status: reqwest::StatusCode,
    },

    /// The upstream responded 200 but set its own failure flag in the body.
    #[error("Upstream rejected request: {provider} - {message}")]
    UpstreamRejected {
        /// The provider that rejected the request
        provider: &'static str,
        /// The failure detail reported by the provider, if any
        message: String,
    },

    /// The upstream responded successfully but the body lacks expected fields
    /// (missing rates map, empty items array, undecodable JSON).
    #[error("Malformed response from {provider}: {message}")]
    MalformedResponse {
        /// The provider that sent the body
        provider: &'static str,
        /// Description of what was missing or undecodable
        message: String,
    },
}

impl FetchError {
    /// Whether a refresh that failed with this error may be recovered by
    /// serving a stale cache entry.
    ///
    /// Transport and status-level failures are transient: the previously
    /// fetched data is still the best answer available. A malformed body is
    /// never recovered from; it propagates so the caller sees that the
    /// provider stopped serving coherent data.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::UpstreamStatus { .. } | Self::UpstreamRejected { .. } => {
                true
            }
            Self::MalformedResponse { .. } => false,
        }
    }
}
