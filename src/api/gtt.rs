//! GTT and OCO order endpoints.

use crate::client::{ApiRequest, IntegrateClient};
use crate::constants::routes;
use crate::error::Result;
use crate::types::gtt::*;
use crate::types::orders::check_id;

impl IntegrateClient {
    /// Place a GTT order.
    ///
    /// **Endpoint:** `POST gttplaceorder`
    pub async fn place_gtt_order(&self, req: &GttOrderRequest) -> Result<AlertResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::GTT_PLACE, req).await
    }

    /// Modify a GTT order.
    ///
    /// **Endpoint:** `POST gttmodify`
    pub async fn modify_gtt_order(&self, req: &ModifyGttOrderRequest) -> Result<AlertResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::GTT_MODIFY, req).await
    }

    /// Cancel a GTT order.
    ///
    /// **Endpoint:** `GET gttcancel/{alert_id}`
    pub async fn cancel_gtt_order(&self, alert_id: &str) -> Result<AlertResponse> {
        self.cancel_alert(routes::GTT_CANCEL, alert_id).await
    }

    /// Place an OCO order.
    ///
    /// **Endpoint:** `POST ocoplaceorder`
    pub async fn place_oco_order(&self, req: &OcoOrderRequest) -> Result<AlertResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::OCO_PLACE, req).await
    }

    /// Modify an OCO order.
    ///
    /// **Endpoint:** `POST ocomodify`
    pub async fn modify_oco_order(&self, req: &ModifyOcoOrderRequest) -> Result<AlertResponse> {
        req.validate(&self.session.valid)?;
        self.post(routes::OCO_MODIFY, req).await
    }

    /// Cancel an OCO order.
    ///
    /// **Endpoint:** `GET ococancel/{alert_id}`
    pub async fn cancel_oco_order(&self, alert_id: &str) -> Result<AlertResponse> {
        self.cancel_alert(routes::OCO_CANCEL, alert_id).await
    }

    /// Retrieve pending GTT and OCO orders.
    ///
    /// **Endpoint:** `GET gttorders`
    pub async fn get_gtt_orders(&self) -> Result<GttOrderBook> {
        self.get(routes::GTT_ORDERS).await
    }

    async fn cancel_alert(&self, route: &str, alert_id: &str) -> Result<AlertResponse> {
        check_id(alert_id, "alert id")?;
        self.send_typed(
            ApiRequest::get(&self.session.base_url, route).url_param("alert_id", alert_id),
        )
        .await
    }
}
