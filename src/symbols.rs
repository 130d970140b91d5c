//! Instrument master: download, extract, parse, and token lookup.
//!
//! The API identifies instruments by exchange token, while callers usually
//! know the trading symbol. [`SymbolMaster`] downloads `allmaster.zip`
//! once, caches the extracted `allmaster.csv` on disk, and keeps the parsed
//! table in memory until the next login invalidates it.

use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use reqwest::Method;
use reqwest::header::HeaderMap;
use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use crate::client::IntegrateClient;
use crate::constants::SYMBOLS_FILE_NAME;
use crate::error::{IntegrateError, Result};
use crate::transport::{HttpRequest, Transport};
use crate::types::enums::Exchange;

/// Minimum number of columns of a usable master-file row.
const MIN_COLUMNS: usize = 14;

/// One row of the instrument master.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub segment: String,
    pub token: String,
    pub symbol: String,
    pub trading_symbol: String,
    pub instrument_type: String,
    pub expiry: String,
    pub tick_size: f64,
    pub lot_size: u64,
    pub option_type: String,
    /// Strike price, `numerator / (denominator * 10^exponent)`.
    pub strike: f64,
    pub isin: String,
    pub price_mult: String,
}

/// Disk + memory cache of the instrument master.
#[derive(Debug)]
pub struct SymbolMaster {
    url: String,
    path: PathBuf,
    table: RwLock<Option<Arc<Vec<Symbol>>>>,
}

impl SymbolMaster {
    pub fn new(url: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            path: path.into(),
            table: RwLock::new(None),
        }
    }

    /// Path of the cached `allmaster.csv`.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Delete the cached file so the next load downloads a fresh copy.
    /// A missing file is not an error.
    pub async fn remove_cached_file(&self) -> Result<()> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), "removed cached instrument master");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Drop the in-memory table.
    pub async fn invalidate(&self) {
        *self.table.write().await = None;
    }

    /// Return the parsed table, downloading and extracting the master file
    /// first if it is not cached on disk.
    pub async fn load(&self, transport: &dyn Transport) -> Result<Arc<Vec<Symbol>>> {
        if let Some(table) = self.table.read().await.as_ref() {
            return Ok(Arc::clone(table));
        }

        let mut guard = self.table.write().await;
        if let Some(table) = guard.as_ref() {
            return Ok(Arc::clone(table));
        }

        if !tokio::fs::try_exists(&self.path).await? {
            self.download(transport).await?;
        }
        let bytes = tokio::fs::read(&self.path).await?;
        let table = Arc::new(parse_master(&bytes)?);
        tracing::info!(instruments = table.len(), "instrument master loaded");

        *guard = Some(Arc::clone(&table));
        Ok(table)
    }

    async fn download(&self, transport: &dyn Transport) -> Result<()> {
        tracing::info!(url = %self.url, "downloading instrument master");
        let resp = transport
            .execute(HttpRequest {
                method: Method::GET,
                url: Url::parse(&self.url)?,
                headers: HeaderMap::new(),
                body: None,
            })
            .await?;

        if !resp.status.is_success() {
            return Err(IntegrateError::HttpStatus {
                status: resp.status,
                body: String::from_utf8_lossy(&resp.body).into_owned(),
            });
        }

        let csv = extract_master(&resp.body)?;
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, csv).await?;
        Ok(())
    }
}

/// Pull `allmaster.csv` out of the downloaded archive.
pub fn extract_master(zip_bytes: &[u8]) -> Result<Vec<u8>> {
    let mut archive = zip::ZipArchive::new(Cursor::new(zip_bytes))?;
    let mut entry = archive.by_name(SYMBOLS_FILE_NAME)?;
    let mut out = Vec::new();
    entry.read_to_end(&mut out)?;
    Ok(out)
}

/// Parse the headerless master CSV. Rows with fewer than 14 columns are
/// skipped.
pub fn parse_master(bytes: &[u8]) -> Result<Vec<Symbol>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut symbols = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.len() < MIN_COLUMNS {
            tracing::warn!(columns = record.len(), "skipping short instrument master row");
            continue;
        }
        let col = |i: usize| record.get(i).unwrap_or_default().trim();

        symbols.push(Symbol {
            segment: col(0).to_owned(),
            token: col(1).to_owned(),
            symbol: col(2).to_owned(),
            trading_symbol: col(3).to_owned(),
            instrument_type: col(4).to_owned(),
            expiry: col(5).to_owned(),
            tick_size: col(6).parse().unwrap_or_default(),
            lot_size: col(7).parse().unwrap_or_default(),
            option_type: col(8).to_owned(),
            strike: strike(col(9), col(10), col(11)),
            isin: col(12).to_owned(),
            price_mult: col(13).to_owned(),
        });
    }
    Ok(symbols)
}

fn strike(numerator: &str, exponent: &str, denominator: &str) -> f64 {
    let num: f64 = numerator.parse().unwrap_or_default();
    let exp: i32 = exponent.parse().unwrap_or_default();
    let den: f64 = denominator.parse().unwrap_or_default();
    let scale = den * 10f64.powi(exp);
    if scale == 0.0 { 0.0 } else { num / scale }
}

/// Find the token of `trading_symbol` on `exchange`.
pub fn find_token<'a>(
    symbols: &'a [Symbol],
    exchange: Exchange,
    trading_symbol: &str,
) -> Option<&'a str> {
    symbols
        .iter()
        .find(|s| s.segment == exchange.as_str() && s.trading_symbol == trading_symbol)
        .map(|s| s.token.as_str())
}

impl IntegrateClient {
    /// Load (downloading if needed) the instrument master.
    pub async fn symbols(&self) -> Result<Arc<Vec<Symbol>>> {
        self.symbols.load(self.transport.as_ref()).await
    }

    /// Resolve a trading symbol to the token the API expects.
    pub async fn resolve_token(&self, exchange: Exchange, trading_symbol: &str) -> Result<String> {
        let table = self.symbols().await?;
        find_token(&table, exchange, trading_symbol)
            .map(str::to_owned)
            .ok_or_else(|| IntegrateError::SymbolNotFound {
                exchange: exchange.to_string(),
                trading_symbol: trading_symbol.to_owned(),
            })
    }
}
