//! Error types for the Wealthsimple Trade API client.
//!
//! This module provides a single error type covering every failure mode of
//! the crate, from input validation through authentication to API-reported
//! request failures.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// A specialized `Result` type for Wealthsimple Trade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for all Wealthsimple Trade API operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Transport-level HTTP failure. Propagated unchanged from the
    /// underlying client; the pipeline performs no retry or backoff.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// A security identifier could not be parsed into a ticker
    #[error("invalid ticker: {0}")]
    InvalidTicker(String),

    /// The exchange portion of a ticker is not a supported exchange
    #[error("invalid exchange: {0}")]
    InvalidExchange(String),

    /// A required URL parameter was absent from the argument bag.
    /// Raised before any network call is made.
    #[error("missing required parameter `{name}` for endpoint `{endpoint}`")]
    MissingParameter {
        /// Name of the absent argument
        name: String,
        /// Endpoint that required it
        endpoint: &'static str,
    },

    /// The access token has expired and no refresh token is available
    #[error("access token expired and no refresh token is available")]
    TokenExpired,

    /// An implicit token refresh was attempted and failed
    #[error("token refresh failed: {source}")]
    RefreshFailed {
        /// The underlying failure
        #[source]
        source: Box<Error>,
    },

    /// Authentication failed (bad credentials, missing token headers)
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// An unrecognized feature name was passed to the feature config
    #[error("unsupported feature: `{0}`")]
    UnsupportedFeature(String),

    /// The API answered with a status outside the success set {200, 201}
    #[error("request failed: status={status}, reason={reason}")]
    RequestFailed {
        /// HTTP status code
        status: u16,
        /// Canonical reason phrase for the status
        reason: String,
        /// Response body parsed as JSON (empty on unparseable bodies)
        body: Value,
    },

    /// A security lookup matched zero or more than one security
    #[error("security lookup failed: {0}")]
    SecurityLookup(String),

    /// Invalid input provided to a function
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Returns `true` if this is an authentication-related error.
    pub fn is_auth_error(&self) -> bool {
        matches!(
            self,
            Error::TokenExpired | Error::RefreshFailed { .. } | Error::Authentication(_)
        )
    }

    /// Returns `true` if this error indicates a client-side issue
    /// (invalid input, missing parameter, bad ticker, etc.).
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::RequestFailed { status, .. } => *status >= 400 && *status < 500,
            Error::InvalidTicker(_)
            | Error::InvalidExchange(_)
            | Error::MissingParameter { .. }
            | Error::UnsupportedFeature(_)
            | Error::InvalidInput(_) => true,
            _ => false,
        }
    }

    /// Returns `true` if this error was reported by the API rather than
    /// raised locally.
    pub fn is_api_error(&self) -> bool {
        matches!(self, Error::RequestFailed { .. })
    }

    /// Build a `RequestFailed` error from a non-success response.
    pub(crate) fn request_failed(status: StatusCode, body: Value) -> Self {
        Error::RequestFailed {
            status: status.as_u16(),
            reason: status
                .canonical_reason()
                .unwrap_or("unknown status")
                .to_string(),
            body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_failed_carries_reason() {
        let err = Error::request_failed(
            StatusCode::UNAUTHORIZED,
            serde_json::json!({"error": "invalid session"}),
        );
        match err {
            Error::RequestFailed {
                status,
                reason,
                body,
            } => {
                assert_eq!(status, 401);
                assert_eq!(reason, "Unauthorized");
                assert_eq!(body["error"], "invalid session");
            }
            _ => panic!("expected RequestFailed"),
        }
    }

    #[test]
    fn test_error_classification() {
        assert!(Error::TokenExpired.is_auth_error());
        assert!(Error::RefreshFailed {
            source: Box::new(Error::TokenExpired)
        }
        .is_auth_error());
        assert!(Error::InvalidTicker("".into()).is_client_error());
        assert!(!Error::TokenExpired.is_api_error());
    }

    #[test]
    fn test_unsupported_feature_names_offender() {
        let err = Error::UnsupportedFeature("frobnicate".into());
        assert!(err.to_string().contains("frobnicate"));
    }
}
