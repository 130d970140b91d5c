//! Environment-driven configuration.

use std::env;

use crate::error::{IntegrateError, Result};

pub const API_TOKEN_VAR: &str = "API_TOKEN";
pub const API_SECRET_VAR: &str = "API_SECRET";
pub const TOTP_VAR: &str = "TOTP";
pub const LOGGING_VAR: &str = "INTEGRATE_LOGGING";

/// Login credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_token: String,
    pub api_secret: String,
    /// OTP for the token exchange. When `None`, login prompts on stdin.
    pub totp: Option<String>,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("api_token", &self.api_token)
            .field("api_secret", &"***")
            .field("totp", &self.totp.as_ref().map(|_| "***"))
            .finish()
    }
}

impl Credentials {
    /// Read `API_TOKEN`, `API_SECRET` and the optional `TOTP`.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            api_token: required(API_TOKEN_VAR)?,
            api_secret: required(API_SECRET_VAR)?,
            totp: optional(TOTP_VAR),
        })
    }
}

/// Whether `INTEGRATE_LOGGING` asks for request/response payload logging.
pub fn logging_from_env() -> bool {
    optional(LOGGING_VAR).is_some_and(|v| parse_flag(&v))
}

/// `1`, `true`, `yes` and `on` (any case) are true.
pub fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

fn required(name: &str) -> Result<String> {
    optional(name).ok_or_else(|| IntegrateError::InvalidArgument(format!("{name} is not set")))
}

fn optional(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}
