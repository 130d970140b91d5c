//! Instrument master download, cache and symbol-based wrappers.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use std::sync::Arc;

use integrate_rs::client::IntegrateClient;
use integrate_rs::error::IntegrateError;
use integrate_rs::mock::MockTransport;
use integrate_rs::types::*;
use zip::write::SimpleFileOptions;

const MASTER: &str = "\
NSE,3045,SBIN,SBIN-EQ,EQ,,0.05,1,,0,0,1,INE062A01020,1
NSE,22,ACC,ACC-EQ,EQ,,0.05,1,,0,0,1,INE012A01025,1
NFO,43210,NIFTY,NIFTY24JAN22000CE,OPTIDX,25012024,0.05,50,CE,2200000,2,1,,1
";

fn master_zip() -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    writer
        .start_file("allmaster.csv", SimpleFileOptions::default())
        .unwrap();
    writer.write_all(MASTER.as_bytes()).unwrap();
    writer.finish().unwrap().into_inner()
}

fn cache_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("integrate-rs-sym-{}-{name}.csv", std::process::id()))
}

fn client(cache: PathBuf) -> (IntegrateClient, Arc<MockTransport>) {
    let _ = std::fs::remove_file(&cache);
    let mock = Arc::new(MockTransport::new());
    let client = IntegrateClient::builder()
        .base_url("https://api.test/v1")
        .symbols_url("https://files.test/allmaster.zip")
        .symbols_path(cache)
        .transport(mock.clone())
        .build()
        .expect("build client");
    (client, mock)
}

#[tokio::test]
async fn master_is_downloaded_once_and_cached() {
    let cache = cache_path("download");
    let (client, mock) = client(cache.clone());
    mock.push_bytes("application/zip", master_zip());

    assert_eq!(client.resolve_token(Exchange::NSE, "SBIN-EQ").await.unwrap(), "3045");
    assert_eq!(
        client
            .resolve_token(Exchange::NFO, "NIFTY24JAN22000CE")
            .await
            .unwrap(),
        "43210"
    );
    assert_eq!(mock.call_count(), 1);
    assert_eq!(
        mock.requests()[0].url.as_str(),
        "https://files.test/allmaster.zip"
    );
    assert!(cache.exists());

    let table = client.symbols().await.unwrap();
    assert_eq!(table.len(), 3);
    assert_eq!(table[2].strike, 22000.0);
    assert_eq!(table[2].lot_size, 50);

    let _ = std::fs::remove_file(&cache);
}

#[tokio::test]
async fn existing_cache_file_skips_download() {
    let cache = cache_path("cached");
    let (client, mock) = client(cache.clone());
    std::fs::write(&cache, MASTER).unwrap();

    assert_eq!(client.resolve_token(Exchange::NSE, "ACC-EQ").await.unwrap(), "22");
    assert_eq!(mock.call_count(), 0);

    let _ = std::fs::remove_file(&cache);
}

#[tokio::test]
async fn unknown_symbol_is_reported() {
    let cache = cache_path("unknown");
    let (client, _mock) = client(cache.clone());
    std::fs::write(&cache, MASTER).unwrap();

    let err = client
        .resolve_token(Exchange::BSE, "SBIN-EQ")
        .await
        .unwrap_err();
    assert!(
        matches!(err, IntegrateError::SymbolNotFound { ref trading_symbol, .. } if trading_symbol == "SBIN-EQ"),
        "got {err:?}"
    );

    let _ = std::fs::remove_file(&cache);
}

#[tokio::test]
async fn quote_by_symbol_resolves_token() {
    let cache = cache_path("quote");
    let (client, mock) = client(cache.clone());
    std::fs::write(&cache, MASTER).unwrap();
    mock.push_json(serde_json::json!({ "status": "SUCCESS", "ltp": "601.10" }));
    mock.push_json(serde_json::json!({ "status": "SUCCESS", "isin": "INE062A01020" }));

    let quote = client
        .get_quotes_for_symbol(Exchange::NSE, "SBIN-EQ")
        .await
        .unwrap();
    assert_eq!(quote.field("ltp"), Some(&serde_json::json!("601.10")));

    client
        .get_security_info_for_symbol(Exchange::NSE, "SBIN-EQ")
        .await
        .unwrap();

    let urls: Vec<String> = mock.requests().iter().map(|r| r.url.to_string()).collect();
    assert_eq!(
        urls,
        vec![
            "https://api.test/v1/quotes/NSE/3045",
            "https://api.test/v1/securityinfo/NSE/3045",
        ]
    );

    let _ = std::fs::remove_file(&cache);
}

#[tokio::test]
async fn failed_download_is_an_error() {
    let cache = cache_path("failed");
    let (client, mock) = client(cache.clone());
    mock.push_json_with_status(
        reqwest::StatusCode::NOT_FOUND,
        serde_json::json!({ "message": "missing" }),
    );

    let err = client
        .resolve_token(Exchange::NSE, "SBIN-EQ")
        .await
        .unwrap_err();
    assert!(matches!(err, IntegrateError::HttpStatus { .. }), "got {err:?}");
    assert!(!cache.exists());
}
