//! Order management endpoints.
//!
//! Every write validates its request against the session's enumerated
//! values first; a rejected request never reaches the transport.

use crate::client::{ApiRequest, IntegrateClient};
use crate::constants::routes;
use crate::error::Result;
use crate::types::orders::*;

impl IntegrateClient {
    /// Place a new order.
    ///
    /// **Endpoint:** `POST placeorder`
    pub async fn place_order(&self, req: &PlaceOrderRequest) -> Result<OrderResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::PLACE_ORDER, req).await
    }

    /// Modify an open order.
    ///
    /// **Endpoint:** `POST modify`
    pub async fn modify_order(&self, req: &ModifyOrderRequest) -> Result<OrderResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::MODIFY_ORDER, req).await
    }

    /// Cancel an open order.
    ///
    /// **Endpoint:** `GET cancel/{order_id}`
    pub async fn cancel_order(&self, order_id: &str) -> Result<OrderResponse> {
        check_id(order_id, "order id")?;
        self.send_typed(
            ApiRequest::get(&self.session.base_url, routes::CANCEL_ORDER)
                .url_param("order_id", order_id),
        )
        .await
    }

    /// Split an order into `slices` child orders submitted together.
    ///
    /// Fails with
    /// [`IntegrateError::SliceOrderRejected`](crate::error::IntegrateError::SliceOrderRejected)
    /// if any child order was rejected, even when others were accepted.
    ///
    /// **Endpoint:** `POST sliceorder`
    pub async fn slice_order(&self, req: &SliceOrderRequest) -> Result<SliceOrderResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::SLICE_ORDER, req).await
    }

    /// Retrieve the order book.
    ///
    /// **Endpoint:** `GET orders`
    pub async fn get_orders(&self) -> Result<OrderBook> {
        self.get(routes::ORDERS).await
    }

    /// Retrieve the status of one order.
    ///
    /// **Endpoint:** `GET order/{order_id}`
    pub async fn get_order(&self, order_id: &str) -> Result<OrderBook> {
        check_id(order_id, "order id")?;
        self.send_typed(
            ApiRequest::get(&self.session.base_url, routes::ORDER)
                .url_param("order_id", order_id),
        )
        .await
    }

    /// Retrieve the trade book.
    ///
    /// **Endpoint:** `GET trades`
    pub async fn get_trades(&self) -> Result<TradeBook> {
        self.get(routes::TRADES).await
    }
}
