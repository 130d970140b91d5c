//! Authentication request/response types.

use serde::{Deserialize, Serialize};

/// Response of the login-initiation call. Carries the OTP challenge token.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginChallenge {
    #[serde(default)]
    pub otp_token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Body of the token exchange.
///
/// Used by `POST {login_url}/token`.
#[derive(Debug, Clone, Serialize)]
pub struct TokenRequest<'a> {
    pub otp_token: &'a str,
    pub otp: &'a str,
    /// Hex SHA-256 of `otp_token + otp + api_secret`.
    pub ac: &'a str,
}

/// Session keys issued by the token exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub uid: String,
    pub actid: String,
    pub api_session_key: String,
    /// Secondary (streaming) session key.
    pub susertoken: String,
}
