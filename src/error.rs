//! Error types for the `integrate-rs` crate.
//!
//! All fallible operations in this crate return [`Result<T>`], which is an
//! alias for `std::result::Result<T, IntegrateError>`.
//!
//! [`IntegrateError`] covers:
//! - **Validation errors**: rejected locally before any request is sent
//! - **Authentication errors**: failures in the two-step login handshake
//! - **API errors**: bodies reporting `"status": "ERROR"`, session expiry,
//!   and slice orders with rejected child orders
//! - **Transport errors**: network, TLS, timeout, unexpected HTTP status
//! - **Decoding errors**: JSON, CSV, zip, and historical line parsing

use std::fmt;

/// Error body returned by the Integrate API (`"status": "ERROR"`).
///
/// The full decoded body is kept so callers can inspect fields the API adds
/// beyond `message`.
#[derive(Debug, Clone)]
pub struct ApiErrorBody {
    /// Human-readable description of the error, when present.
    pub message: Option<String>,
    /// The complete decoded response body.
    pub body: serde_json::Value,
}

impl ApiErrorBody {
    pub(crate) fn from_body(body: serde_json::Value) -> Self {
        let message = body
            .get("message")
            .and_then(|m| m.as_str())
            .map(str::to_owned);
        Self { message, body }
    }
}

impl fmt::Display for ApiErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({})",
            self.message.as_deref().unwrap_or("No message"),
            self.body
        )
    }
}

/// All possible errors produced by the `integrate-rs` client.
#[derive(Debug, thiserror::Error)]
pub enum IntegrateError {
    /// The caller provided an invalid argument. Never reaches the network.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The login handshake failed.
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// An error response returned by the Integrate REST API.
    #[error("API error: {0}")]
    Api(ApiErrorBody),

    /// The API reported `Session Expired` and the registered callback ran.
    #[error("Session expired: {0}")]
    SessionExpired(ApiErrorBody),

    /// A slice order succeeded overall but at least one child order failed.
    #[error("Slice order rejected: {0}")]
    SliceOrderRejected(ApiErrorBody),

    /// The server returned an unexpected HTTP status code.
    #[error("HTTP {status}: {body}")]
    HttpStatus {
        /// The HTTP status code.
        status: reqwest::StatusCode,
        /// The response body text.
        body: String,
    },

    /// The response carried a content type the dispatcher cannot decode.
    #[error("Unknown Content-Type ({content_type}): {status}")]
    UnexpectedContentType {
        /// The declared content type, empty when missing.
        content_type: String,
        /// The HTTP status code.
        status: reqwest::StatusCode,
    },

    /// A network or transport-level error from `reqwest`.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Failed to serialize or deserialize JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Failed to decode a CSV body or the instrument master file.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// An error building or parsing a URL.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// A filesystem error while handling the instrument master file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The instrument master archive could not be read.
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// No instrument matches the exchange and trading symbol.
    #[error("token not found for {trading_symbol} on {exchange} in symbols file")]
    SymbolNotFound {
        /// The exchange that was searched.
        exchange: String,
        /// The trading symbol that was searched.
        trading_symbol: String,
    },

    /// A historical data line could not be parsed.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IntegrateError>;
