//! Request dispatcher behaviour against the recording mock transport.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use integrate_rs::client::{ApiRequest, IntegrateClient};
use integrate_rs::error::IntegrateError;
use integrate_rs::mock::MockTransport;
use integrate_rs::session::SessionKeys;
use integrate_rs::types::orders::*;
use integrate_rs::types::*;
use reqwest::{Method, StatusCode};

const BASE: &str = "https://api.test/v1";

fn client() -> (IntegrateClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = IntegrateClient::builder()
        .base_url(BASE)
        .transport(mock.clone())
        .build()
        .expect("build client");
    (client, mock)
}

fn slice_request() -> SliceOrderRequest {
    SliceOrderRequest {
        order: PlaceOrderRequest::new(
            Exchange::NFO,
            "NIFTY24JAN22000CE",
            OrderType::BUY,
            1800,
            PriceType::LIMIT,
            50.0,
            ProductType::NORMAL,
        ),
        slices: 2,
    }
}

// ===================================================================
// Decoding
// ===================================================================

#[tokio::test]
async fn csv_body_decodes_to_data_rows() {
    let (client, mock) = client();
    mock.push_csv("A,B\n1,2\n3,4");

    let value = client
        .send(ApiRequest::get(BASE, "anything"))
        .await
        .expect("csv decode");
    assert_eq!(
        value,
        serde_json::json!({ "data": [["A", "B"], ["1", "2"], ["3", "4"]] })
    );
}

#[tokio::test]
async fn json_with_charset_decodes() {
    let (client, mock) = client();
    mock.push_bytes(
        "application/json; charset=utf-8",
        r#"{"status":"SUCCESS","orders":[]}"#,
    );
    let book = client.get_orders().await.expect("order book");
    assert!(book.orders.is_empty());
    assert_eq!(book.status.as_deref(), Some("SUCCESS"));
}

#[tokio::test]
async fn unknown_content_type_is_an_error() {
    let (client, mock) = client();
    mock.push_text("<html>maintenance</html>");

    let err = client.get_orders().await.unwrap_err();
    assert!(
        matches!(err, IntegrateError::UnexpectedContentType { ref content_type, .. } if content_type == "text/plain"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn non_success_status_without_error_body() {
    let (client, mock) = client();
    mock.push_json_with_status(StatusCode::BAD_GATEWAY, serde_json::json!({ "detail": "down" }));

    let err = client.get_holdings().await.unwrap_err();
    assert!(
        matches!(err, IntegrateError::HttpStatus { status, .. } if status == StatusCode::BAD_GATEWAY),
        "got {err:?}"
    );
}

#[tokio::test]
async fn error_status_body_is_api_error() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "ERROR", "message": "Invalid Order" }));

    let err = client.get_trades().await.unwrap_err();
    match err {
        IntegrateError::Api(body) => assert_eq!(body.message.as_deref(), Some("Invalid Order")),
        other => panic!("expected Api, got {other:?}"),
    }
}

// ===================================================================
// Slice orders
// ===================================================================

#[tokio::test]
async fn slice_order_with_failed_child_is_rejected() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({
        "status": "SUCCESS",
        "orders": [
            { "status": "SUCCESS", "order_id": "1" },
            { "status": "ERROR", "message": "RMS: margin exceeds" }
        ]
    }));

    let err = client.slice_order(&slice_request()).await.unwrap_err();
    assert!(matches!(err, IntegrateError::SliceOrderRejected(_)), "got {err:?}");
}

#[tokio::test]
async fn slice_order_all_children_ok() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({
        "status": "SUCCESS",
        "orders": [
            { "status": "SUCCESS", "order_id": "1" },
            { "status": "SUCCESS", "order_id": "2" }
        ]
    }));

    let resp = client.slice_order(&slice_request()).await.unwrap();
    assert_eq!(resp.orders.len(), 2);
    assert_eq!(resp.orders[1].order_id.as_deref(), Some("2"));

    let body = mock.last_json_body().unwrap();
    assert_eq!(body["slices"], 2);
    assert_eq!(body["tradingsymbol"], "NIFTY24JAN22000CE");
}

#[tokio::test]
async fn failed_child_on_other_routes_is_returned_as_is() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({
        "status": "SUCCESS",
        "orders": [{ "status": "ERROR" }]
    }));

    let value = client
        .send(ApiRequest::get(BASE, "orders"))
        .await
        .expect("only slice orders inspect children");
    assert_eq!(value["orders"][0]["status"], "ERROR");
}

// ===================================================================
// Session expiry
// ===================================================================

#[tokio::test]
async fn session_expired_runs_callback() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = calls.clone();

    let mock = Arc::new(MockTransport::new());
    let client = IntegrateClient::builder()
        .transport(mock.clone())
        .on_session_expired(move || {
            seen.fetch_add(1, Ordering::SeqCst);
        })
        .build()
        .unwrap();

    mock.push_json(serde_json::json!({ "status": "ERROR", "message": "Session Expired" }));
    let err = client.get_positions().await.unwrap_err();

    assert!(matches!(err, IntegrateError::SessionExpired(_)), "got {err:?}");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn session_expired_without_callback_is_api_error() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "ERROR", "message": "Session Expired" }));

    let err = client.get_positions().await.unwrap_err();
    assert!(matches!(err, IntegrateError::Api(_)), "got {err:?}");
}

// ===================================================================
// Request shape
// ===================================================================

#[tokio::test]
async fn authorization_header_after_keys_are_set() {
    let (mut client, mock) = client();

    mock.push_json(serde_json::json!({ "status": "SUCCESS" }));
    client.get_limits().await.unwrap();
    assert!(!mock.requests()[0].headers.contains_key("authorization"));

    client.set_session_keys(SessionKeys {
        uid: "U1".into(),
        actid: "A1".into(),
        api_session_key: "KEY".into(),
        susertoken: "SUSER".into(),
    });
    assert!(client.session().is_authenticated());

    mock.push_json(serde_json::json!({ "status": "SUCCESS", "cash": "1000" }));
    let limits = client.get_limits().await.unwrap();
    assert_eq!(limits.field("cash"), Some(&serde_json::json!("1000")));

    let req = &mock.requests()[1];
    assert_eq!(req.headers["authorization"], "KEY");
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.url.as_str(), "https://api.test/v1/limits");
    assert!(req.body.is_none());
}

#[tokio::test]
async fn url_params_are_substituted() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "SUCCESS", "ltp": "500.5" }));
    mock.push_json(serde_json::json!({ "status": "SUCCESS", "order_id": "240101000001" }));
    mock.push_json(serde_json::json!({ "status": "SUCCESS", "alert_id": "9" }));

    client.get_quotes(Exchange::NSE, "22").await.unwrap();
    client.cancel_order("240101000001").await.unwrap();
    client.cancel_oco_order("9").await.unwrap();

    let urls: Vec<String> = mock.requests().iter().map(|r| r.url.to_string()).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.test/v1/quotes/NSE/22",
            "https://api.test/v1/cancel/240101000001",
            "https://api.test/v1/ococancel/9",
        ]
    );
}

#[tokio::test]
async fn json_body_wins_over_form() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "SUCCESS" }));

    let req = ApiRequest::post(BASE, "margin")
        .form([("a", "1")])
        .json(&serde_json::json!({ "b": 2 }))
        .unwrap();
    client.send(req).await.unwrap();

    let sent = &mock.requests()[0];
    assert_eq!(sent.headers["content-type"], "application/json");
    assert_eq!(mock.last_json_body(), Some(serde_json::json!({ "b": 2 })));
}

#[tokio::test]
async fn form_body_and_query_string() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "SUCCESS" }));

    let req = ApiRequest::post(BASE, "anything")
        .form([("exchange", "NSE"), ("q", "a b")])
        .query("page", 2);
    client.send(req).await.unwrap();

    let sent = &mock.requests()[0];
    assert_eq!(sent.headers["content-type"], "application/x-www-form-urlencoded");
    assert_eq!(sent.body.as_deref(), Some(&b"exchange=NSE&q=a+b"[..]));
    assert_eq!(sent.url.query(), Some("page=2"));
}

#[tokio::test]
async fn get_never_carries_a_body() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "SUCCESS" }));

    let req = ApiRequest::get(BASE, "orders")
        .json(&serde_json::json!({ "ignored": true }))
        .unwrap();
    client.send(req).await.unwrap();
    assert!(mock.requests()[0].body.is_none());
}

#[tokio::test]
async fn empty_queue_answers_not_implemented() {
    let (client, _mock) = client();
    let err = client.get_orders().await.unwrap_err();
    assert!(
        matches!(err, IntegrateError::HttpStatus { status, .. } if status == StatusCode::NOT_IMPLEMENTED),
        "got {err:?}"
    );
}
