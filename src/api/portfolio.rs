//! Portfolio endpoints: positions, holdings, conversion, limits, margin.

use crate::client::IntegrateClient;
use crate::constants::routes;
use crate::error::{IntegrateError, Result};
use crate::types::ApiResponse;
use crate::types::portfolio::*;

impl IntegrateClient {
    /// Retrieve open positions for the day.
    ///
    /// **Endpoint:** `GET positions`
    pub async fn get_positions(&self) -> Result<PositionBook> {
        self.get(routes::POSITIONS).await
    }

    /// Retrieve demat holdings.
    ///
    /// **Endpoint:** `GET holdings`
    pub async fn get_holdings(&self) -> Result<Holdings> {
        self.get(routes::HOLDINGS).await
    }

    /// Convert a position's product type (e.g. intraday → delivery).
    ///
    /// **Endpoint:** `POST productconversion`
    pub async fn convert_position_product_type(
        &self,
        req: &ConvertPositionRequest,
    ) -> Result<ApiResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::PRODUCT_CONVERSION, req).await
    }

    /// Retrieve account balance and cash margin for all segments.
    ///
    /// **Endpoint:** `GET limits`
    pub async fn get_limits(&self) -> Result<ApiResponse> {
        self.get(routes::LIMITS).await
    }

    /// Margin required for a basket of orders.
    ///
    /// **Endpoint:** `POST margin`
    pub async fn get_margins(&self, orders: &[MarginOrder]) -> Result<ApiResponse> {
        if orders.is_empty() {
            return Err(IntegrateError::InvalidArgument("margin basket is empty".into()));
        }
        for order in orders {
            order.validate(&self.session.valid)?;
        }
        self.post(routes::MARGIN, &MarginBasket { basketlists: orders })
            .await
    }

    /// SPAN and exposure margin for a set of positions.
    ///
    /// **Endpoint:** `POST spancalculator`
    pub async fn span_calculator(&self, positions: &[SpanPosition]) -> Result<ApiResponse> {
        if positions.is_empty() {
            return Err(IntegrateError::InvalidArgument("no positions given".into()));
        }
        for position in positions {
            position.validate(&self.session.valid)?;
        }
        self.post(routes::SPAN_CALCULATOR, &SpanBasket { positions })
            .await
    }
}
