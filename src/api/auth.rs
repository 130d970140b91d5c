//! Authentication: the two-step login handshake.
//!
//! These methods hit the sign-in host (`login_url`), not the trading API
//! base URL.

use sha2::{Digest, Sha256};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::sync::mpsc::error::TrySendError;

use crate::client::{ApiRequest, IntegrateClient};
use crate::constants::routes;
use crate::error::{IntegrateError, Result};
use crate::session::SessionKeys;
use crate::types::auth::{LoginChallenge, TokenRequest, TokenResponse};

/// Session-proof digest sent with the token exchange:
/// hex-encoded SHA-256 of `otp_token + otp + api_secret`.
pub fn session_digest(otp_token: &str, otp: &str, api_secret: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(otp_token.as_bytes());
    hasher.update(otp.as_bytes());
    hasher.update(api_secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl IntegrateClient {
    /// Log in and store the issued session keys.
    ///
    /// 1. `GET {login_url}/login/{api_token}` with the `api_secret` header
    ///    returns an OTP challenge token.
    /// 2. The OTP is `totp` when given, otherwise it is read from stdin.
    /// 3. `POST {login_url}/token` with the challenge, the OTP, and
    ///    [`session_digest`] returns the session keys.
    ///
    /// On success the cached instrument master is deleted (a missing file is
    /// fine) and one `()` is offered on the "symbols ready" channel.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrate_rs::client::IntegrateClient;
    /// # #[tokio::main]
    /// # async fn main() -> integrate_rs::Result<()> {
    /// let mut client = IntegrateClient::new()?;
    /// let keys = client.login("api-token", "api-secret", Some("123456")).await?;
    /// println!("logged in as {}", keys.uid);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(
        &mut self,
        api_token: &str,
        api_secret: &str,
        totp: Option<&str>,
    ) -> Result<SessionKeys> {
        if api_token.is_empty() || api_secret.is_empty() {
            return Err(IntegrateError::Auth(
                "invalid api_token or api_secret".into(),
            ));
        }

        let login_url = self.session.login_url.clone();

        let challenge: LoginChallenge = self
            .send_typed(
                ApiRequest::get(&login_url, routes::LOGIN)
                    .url_param("api_token", api_token)
                    .header("api_secret", api_secret),
            )
            .await?;
        let otp_token = challenge
            .otp_token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| IntegrateError::Auth("failed to obtain otp_token".into()))?;

        let otp = match totp {
            Some(code) => code.trim().to_owned(),
            None => prompt_otp().await?,
        };
        if otp.is_empty() {
            return Err(IntegrateError::Auth("no OTP/TOTP provided".into()));
        }

        let ac = session_digest(&otp_token, &otp, api_secret);
        let body = TokenRequest {
            otp_token: &otp_token,
            otp: &otp,
            ac: &ac,
        };
        let value = self
            .send(ApiRequest::post(&login_url, routes::TOKEN).json(&body)?)
            .await?;
        let token: TokenResponse = serde_json::from_value(value)
            .map_err(|e| IntegrateError::Auth(format!("unexpected token response: {e}")))?;

        let keys = SessionKeys {
            uid: token.uid,
            actid: token.actid,
            api_session_key: token.api_session_key,
            susertoken: token.susertoken,
        };
        self.session.set_keys(keys.clone());
        tracing::info!(uid = %keys.uid, "logged in");

        self.symbols.remove_cached_file().await?;
        self.symbols.invalidate().await;
        match self.symbols_ready_tx.try_send(()) {
            Ok(()) => {}
            Err(TrySendError::Full(())) => {
                tracing::debug!("symbols ready signal already pending");
            }
            Err(TrySendError::Closed(())) => {
                tracing::debug!("symbols ready receiver dropped");
            }
        }

        Ok(keys)
    }
}

async fn prompt_otp() -> Result<String> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(b"Enter OTP/External TOTP: ").await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim().to_owned())
}
