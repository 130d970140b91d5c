//! Historical data stream over the recording mock transport.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use futures_util::StreamExt;
use integrate_rs::client::IntegrateClient;
use integrate_rs::error::IntegrateError;
use integrate_rs::mock::MockTransport;
use integrate_rs::types::historical::{HistoricalRecord, HistoricalRequest};
use integrate_rs::types::*;
use reqwest::StatusCode;

fn client() -> (IntegrateClient, Arc<MockTransport>) {
    let mock = Arc::new(MockTransport::new());
    let client = IntegrateClient::builder()
        .data_url("https://data.test/sds")
        .transport(mock.clone())
        .build()
        .expect("build client");
    (client, mock)
}

fn at(d: u32, h: u32, m: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, d)
        .unwrap()
        .and_hms_opt(h, m, 0)
        .unwrap()
}

fn request(timeframe: Timeframe) -> HistoricalRequest {
    HistoricalRequest {
        exchange: Exchange::NSE,
        token: "22".into(),
        timeframe,
        start: at(1, 9, 15),
        end: at(5, 15, 30),
    }
}

#[tokio::test]
async fn bars_are_streamed_in_order() {
    let (client, mock) = client();
    mock.push_text(
        "010120240900,100.5,101.0,99.5,100.8,500,10\n\
         020120240900,100.8,102.0,100.1,101.9,650,12\n\
         \n",
    );

    let records: Vec<_> = client
        .historical_data(&request(Timeframe::DAY))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(records.len(), 2);
    let HistoricalRecord::Bar(first) = records[0].as_ref().unwrap() else {
        panic!("expected bar");
    };
    assert_eq!(first.datetime, at(1, 9, 0));
    assert_eq!(first.close, 100.8);
    assert_eq!(first.volume, 500);
    let HistoricalRecord::Bar(second) = records[1].as_ref().unwrap() else {
        panic!("expected bar");
    };
    assert_eq!(second.high, 102.0);

    let url = mock.requests()[0].url.to_string();
    assert_eq!(
        url,
        "https://data.test/sds/history/NSE/22/day/010120240915/050120241530"
    );
}

#[tokio::test]
async fn ticks_and_bad_lines() {
    let (client, mock) = client();
    mock.push_text("1704079800,100.5,25,0\nnot,a,valid,tick\n1,2\n1704079801,100.6,5,0\n");

    let records: Vec<_> = client
        .historical_data(&request(Timeframe::TICK))
        .await
        .unwrap()
        .collect()
        .await;

    assert_eq!(records.len(), 3);
    assert!(matches!(records[0], Ok(HistoricalRecord::Tick(ref t)) if t.ltq == 25));
    assert!(matches!(records[1], Err(IntegrateError::Parse(_))));
    assert!(matches!(records[2], Ok(HistoricalRecord::Tick(ref t)) if t.utc == 1704079801));
}

#[tokio::test]
async fn json_error_body_fails_the_call() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "ERROR", "message": "No data" }));

    let result = client.historical_data(&request(Timeframe::MINUTE)).await;
    assert!(matches!(result, Err(IntegrateError::Api(_))));
}

#[tokio::test]
async fn http_failure_fails_the_call() {
    let (client, mock) = client();
    mock.push_response(integrate_rs::transport::HttpResponse {
        status: StatusCode::INTERNAL_SERVER_ERROR,
        content_type: Some("text/plain".into()),
        body: "boom".into(),
    });

    let result = client.historical_data(&request(Timeframe::DAY)).await;
    assert!(matches!(
        result,
        Err(IntegrateError::HttpStatus { status, .. }) if status == StatusCode::INTERNAL_SERVER_ERROR
    ));
}

#[tokio::test]
async fn early_drop_stops_the_worker() {
    let (client, mock) = client();
    let body: String = (0..2_000)
        .map(|i| format!("{},100.0,1,0\n", 1_704_079_800 + i))
        .collect();
    mock.push_text(body);

    let mut stream = client
        .historical_data(&request(Timeframe::TICK))
        .await
        .unwrap();
    for _ in 0..3 {
        assert!(stream.next().await.unwrap().is_ok());
    }
    drop(stream);

    mock.push_text("1704079800,100.5,25,0\n");
    let rest: Vec<_> = client
        .historical_data(&request(Timeframe::TICK))
        .await
        .unwrap()
        .collect()
        .await;
    assert_eq!(rest.len(), 1);
}

#[tokio::test]
async fn html_page_is_not_history() {
    let (client, mock) = client();
    mock.push_bytes("text/html", "<html>maintenance</html>");

    let err = client
        .historical_data(&request(Timeframe::DAY))
        .await
        .unwrap_err();
    assert!(
        matches!(err, IntegrateError::UnexpectedContentType { ref content_type, .. } if content_type == "text/html"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn plain_text_without_records_is_rejected() {
    let (client, mock) = client();
    mock.push_text("<html>\n<body>maintenance</body>\n</html>\n");

    let err = client
        .historical_data(&request(Timeframe::DAY))
        .await
        .unwrap_err();
    assert!(matches!(err, IntegrateError::Parse(_)), "got {err:?}");
}

#[tokio::test]
async fn json_without_data_is_rejected() {
    let (client, mock) = client();
    mock.push_json(serde_json::json!({ "status": "SUCCESS" }));

    let err = client
        .historical_data(&request(Timeframe::DAY))
        .await
        .unwrap_err();
    assert!(
        matches!(err, IntegrateError::Parse(ref m) if m == "unexpected response format"),
        "got {err:?}"
    );
}

#[tokio::test]
async fn empty_body_is_an_empty_stream() {
    let (client, mock) = client();
    mock.push_text("");

    let records: Vec<_> = client
        .historical_data(&request(Timeframe::DAY))
        .await
        .unwrap()
        .collect()
        .await;
    assert!(records.is_empty());
}
