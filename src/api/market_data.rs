//! Market quote and security information endpoints.

use crate::client::{ApiRequest, IntegrateClient};
use crate::constants::routes;
use crate::error::Result;
use crate::types::ApiResponse;
use crate::types::enums::Exchange;
use crate::types::orders::check_id;

impl IntegrateClient {
    /// Retrieve the quote of an instrument.
    ///
    /// **Endpoint:** `GET quotes/{exchange}/{token}`
    pub async fn get_quotes(&self, exchange: Exchange, token: &str) -> Result<ApiResponse> {
        self.instrument_lookup(routes::QUOTES, exchange, token)
            .await
    }

    /// Retrieve the quote of an instrument by trading symbol, resolving the
    /// token through the instrument master.
    pub async fn get_quotes_for_symbol(
        &self,
        exchange: Exchange,
        trading_symbol: &str,
    ) -> Result<ApiResponse> {
        let token = self.resolve_token(exchange, trading_symbol).await?;
        self.get_quotes(exchange, &token).await
    }

    /// Retrieve static information about an instrument.
    ///
    /// **Endpoint:** `GET securityinfo/{exchange}/{token}`
    pub async fn get_security_info(&self, exchange: Exchange, token: &str) -> Result<ApiResponse> {
        self.instrument_lookup(routes::SECURITY_INFO, exchange, token)
            .await
    }

    /// [`get_security_info`](Self::get_security_info) by trading symbol.
    pub async fn get_security_info_for_symbol(
        &self,
        exchange: Exchange,
        trading_symbol: &str,
    ) -> Result<ApiResponse> {
        let token = self.resolve_token(exchange, trading_symbol).await?;
        self.get_security_info(exchange, &token).await
    }

    async fn instrument_lookup(
        &self,
        route: &str,
        exchange: Exchange,
        token: &str,
    ) -> Result<ApiResponse> {
        self.session.valid.check_exchange(exchange)?;
        check_id(token, "token")?;
        self.send_typed(
            ApiRequest::get(&self.session.base_url, route)
                .url_param("exchange", exchange)
                .url_param("token", token),
        )
        .await
    }
}
