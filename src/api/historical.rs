//! Historical data: bar and tick downloads.
//!
//! The service answers with one bulk body of comma-joined lines. The body is
//! fetched up front, then a worker task parses it line by line into a
//! bounded channel consumed through [`HistoricalStream`].

use std::pin::Pin;
use std::task::{Context, Poll};

use chrono::NaiveDateTime;
use futures_util::Stream;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::client::{ApiRequest, IntegrateClient};
use crate::constants::{HISTORY_CHANNEL_CAPACITY, HISTORY_DATE_FORMAT, routes};
use crate::error::{IntegrateError, Result};
use crate::types::enums::{Exchange, Timeframe};
use crate::types::historical::{Bar, HistoricalRecord, HistoricalRequest, Tick};

impl IntegrateClient {
    /// Download historical bars or ticks.
    ///
    /// Request-level failures (validation, transport, HTTP status, API error
    /// body) are returned directly. Line-level parse failures are yielded as
    /// `Err` items of the stream; lines with a field count other than 7 or 4
    /// are skipped.
    ///
    /// Dropping the stream before it is drained stops the worker.
    ///
    /// **Endpoint:** `GET {data_url}/history/{exchange}/{token}/{timeframe}/{start}/{end}`
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use integrate_rs::client::IntegrateClient;
    /// # use integrate_rs::types::historical::HistoricalRequest;
    /// # use integrate_rs::types::{Exchange, Timeframe};
    /// use futures_util::StreamExt;
    ///
    /// # async fn run(client: &IntegrateClient) -> integrate_rs::Result<()> {
    /// let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(9, 15, 0).unwrap();
    /// let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap().and_hms_opt(15, 30, 0).unwrap();
    /// let mut bars = client
    ///     .historical_data(&HistoricalRequest {
    ///         exchange: Exchange::NSE,
    ///         token: "22".into(),
    ///         timeframe: Timeframe::DAY,
    ///         start,
    ///         end,
    ///     })
    ///     .await?;
    /// while let Some(record) = bars.next().await {
    ///     println!("{:?}", record?);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn historical_data(&self, req: &HistoricalRequest) -> Result<HistoricalStream> {
        req.validate(&self.session.valid)?;

        let request = ApiRequest::get(&self.session.data_url, routes::HISTORY)
            .url_param("exchange", req.exchange)
            .url_param("token", &req.token)
            .url_param("timeframe", req.timeframe)
            .url_param("start", req.start.format(HISTORY_DATE_FORMAT))
            .url_param("end", req.end.format(HISTORY_DATE_FORMAT));

        let http = self.prepare(&request)?;
        let resp = self.transport.execute(http).await?;
        let lines = match resp.media_type().as_str() {
            "application/json" => json_lines(self.decode(request.route(), resp)?)?,
            _ if !resp.status.is_success() => {
                return Err(IntegrateError::HttpStatus {
                    status: resp.status,
                    body: String::from_utf8_lossy(&resp.body).into_owned(),
                });
            }
            "text/csv" | "text/plain" => text_lines(&resp.body)?,
            _ => {
                return Err(IntegrateError::UnexpectedContentType {
                    content_type: resp.content_type.clone().unwrap_or_default(),
                    status: resp.status,
                });
            }
        };
        tracing::debug!(lines = lines.len(), "historical body received");

        Ok(HistoricalStream::spawn(lines))
    }

    /// [`historical_data`](Self::historical_data) by trading symbol, resolving
    /// the token through the instrument master.
    pub async fn historical_data_for_symbol(
        &self,
        exchange: Exchange,
        trading_symbol: &str,
        timeframe: Timeframe,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<HistoricalStream> {
        self.session.valid.check_exchange(exchange)?;
        self.session.valid.check_timeframe(timeframe)?;
        let token = self.resolve_token(exchange, trading_symbol).await?;
        self.historical_data(&HistoricalRequest {
            exchange,
            token,
            timeframe,
            start,
            end,
        })
        .await
    }
}

fn text_lines(body: &[u8]) -> Result<Vec<String>> {
    let lines = String::from_utf8_lossy(body)
        .lines()
        .map(str::to_owned)
        .collect();
    check_shape(lines)
}

fn json_lines(data: Value) -> Result<Vec<String>> {
    let lines = match data.get("data") {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s.clone()),
                Value::Array(fields) => Some(
                    fields
                        .iter()
                        .map(|f| match f {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect::<Vec<_>>()
                        .join(","),
                ),
                _ => None,
            })
            .collect(),
        Some(Value::String(s)) => s.lines().map(str::to_owned).collect(),
        _ => return Err(unexpected_format()),
    };
    check_shape(lines)
}

/// A non-empty body must contain at least one bar or tick shaped line.
fn check_shape(lines: Vec<String>) -> Result<Vec<String>> {
    let mut content = lines.iter().filter(|l| !l.trim().is_empty()).peekable();
    if content.peek().is_some() && !content.any(|l| record_shaped(l)) {
        return Err(unexpected_format());
    }
    Ok(lines)
}

fn record_shaped(line: &str) -> bool {
    matches!(line.trim().split(',').count(), 7 | 4)
}

fn unexpected_format() -> IntegrateError {
    IntegrateError::Parse("unexpected response format".into())
}

// ---------------------------------------------------------------------------
// Line parsing
// ---------------------------------------------------------------------------

/// Parse one line of a historical body.
///
/// Returns `None` for lines that are neither bars (7 fields) nor ticks
/// (4 fields).
pub fn parse_history_line(line: &str) -> Option<Result<HistoricalRecord>> {
    let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
    match fields.len() {
        7 => Some(parse_bar(&fields).map(HistoricalRecord::Bar)),
        4 => Some(parse_tick(&fields).map(HistoricalRecord::Tick)),
        _ => None,
    }
}

fn parse_bar(f: &[&str]) -> Result<Bar> {
    let datetime = NaiveDateTime::parse_from_str(f[0], HISTORY_DATE_FORMAT)
        .map_err(|e| IntegrateError::Parse(format!("bar datetime `{}`: {e}", f[0])))?;
    Ok(Bar {
        datetime,
        open: parse_price(f[1])?,
        high: parse_price(f[2])?,
        low: parse_price(f[3])?,
        close: parse_price(f[4])?,
        volume: parse_count(f[5])?,
        oi: parse_count(f[6])?,
    })
}

fn parse_tick(f: &[&str]) -> Result<Tick> {
    let utc = f[0]
        .parse::<i64>()
        .map_err(|e| IntegrateError::Parse(format!("tick time `{}`: {e}", f[0])))?;
    Ok(Tick {
        utc,
        ltp: parse_price(f[1])?,
        ltq: parse_count(f[2])?,
        oi: parse_count(f[3])?,
    })
}

fn parse_price(s: &str) -> Result<f64> {
    s.parse()
        .map_err(|e| IntegrateError::Parse(format!("price `{s}`: {e}")))
}

/// Volumes and open interest sometimes arrive as `"500.0"`.
fn parse_count(s: &str) -> Result<u64> {
    if let Ok(n) = s.parse::<u64>() {
        return Ok(n);
    }
    match s.parse::<f64>() {
        Ok(f) if f >= 0.0 && f.fract() == 0.0 => Ok(f as u64),
        _ => Err(IntegrateError::Parse(format!("count `{s}`"))),
    }
}

// ---------------------------------------------------------------------------
// Stream
// ---------------------------------------------------------------------------

/// Finite, non-restartable sequence of historical records.
///
/// Backed by a worker task feeding a bounded channel. Dropping the stream
/// aborts the worker.
#[derive(Debug)]
pub struct HistoricalStream {
    rx: mpsc::Receiver<Result<HistoricalRecord>>,
    worker: JoinHandle<()>,
}

impl HistoricalStream {
    fn spawn(lines: Vec<String>) -> Self {
        let (tx, rx) = mpsc::channel(HISTORY_CHANNEL_CAPACITY);
        let worker = tokio::spawn(async move {
            for line in lines {
                let Some(record) = parse_history_line(&line) else {
                    if !line.trim().is_empty() {
                        tracing::debug!(
                            fields = line.split(',').count(),
                            "skipping historical line"
                        );
                    }
                    continue;
                };
                if tx.send(record).await.is_err() {
                    tracing::debug!("historical consumer gone, stopping worker");
                    return;
                }
            }
        });
        Self { rx, worker }
    }
}

impl Stream for HistoricalStream {
    type Item = Result<HistoricalRecord>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

impl Drop for HistoricalStream {
    fn drop(&mut self) {
        self.worker.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn seven_fields_is_a_bar() {
        let rec = parse_history_line("010120240900,100.5,101.0,99.5,100.8,500,10")
            .unwrap()
            .unwrap();
        let HistoricalRecord::Bar(bar) = rec else {
            panic!("expected bar, got {rec:?}");
        };
        assert_eq!(
            bar.datetime,
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap()
        );
        assert_eq!(bar.open, 100.5);
        assert_eq!(bar.high, 101.0);
        assert_eq!(bar.low, 99.5);
        assert_eq!(bar.close, 100.8);
        assert_eq!(bar.volume, 500);
        assert_eq!(bar.oi, 10);
    }

    #[test]
    fn four_fields_is_a_tick() {
        let rec = parse_history_line("1704079800,100.5,25,0\r").unwrap().unwrap();
        assert_eq!(
            rec,
            HistoricalRecord::Tick(Tick {
                utc: 1704079800,
                ltp: 100.5,
                ltq: 25,
                oi: 0,
            })
        );
    }

    #[test]
    fn other_shapes_are_skipped() {
        assert!(parse_history_line("").is_none());
        assert!(parse_history_line("a,b").is_none());
        assert!(parse_history_line("1,2,3,4,5").is_none());
    }

    #[test]
    fn malformed_numbers_are_errors() {
        assert!(parse_history_line("010120240900,x,101.0,99.5,100.8,500,10")
            .unwrap()
            .is_err());
        assert!(parse_history_line("later,1,2,3").unwrap().is_err());
    }

    #[test]
    fn counts_accept_integral_floats() {
        assert_eq!(parse_count("500.0").unwrap(), 500);
        assert!(parse_count("1.5").is_err());
        assert!(parse_count("-1").is_err());
    }

    #[test]
    fn json_rows_are_joined() {
        let lines =
            json_lines(serde_json::json!({ "data": [["1", "2", "3", "4"], "5,6,7,8"] })).unwrap();
        assert_eq!(lines, vec!["1,2,3,4", "5,6,7,8"]);
    }

    #[test]
    fn json_without_data_is_rejected() {
        assert!(matches!(
            json_lines(serde_json::json!({ "status": "SUCCESS" })),
            Err(IntegrateError::Parse(_))
        ));
        assert!(matches!(
            json_lines(serde_json::json!({ "data": 5 })),
            Err(IntegrateError::Parse(_))
        ));
        assert!(json_lines(serde_json::json!({ "data": [] })).unwrap().is_empty());
    }

    #[test]
    fn body_without_records_is_rejected() {
        assert!(text_lines(b"").unwrap().is_empty());
        assert!(text_lines(b"\n\n").unwrap().is_empty());
        assert!(matches!(
            text_lines(b"<html>\n<body>down for maintenance</body>\n</html>"),
            Err(IntegrateError::Parse(_))
        ));
        assert_eq!(text_lines(b"header\n1,2,3,4\n").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn dropping_the_stream_aborts_the_worker() {
        let lines = (0..HISTORY_CHANNEL_CAPACITY * 4)
            .map(|i| format!("{},100.0,1,0", 1_704_079_800 + i))
            .collect();
        let mut stream = HistoricalStream::spawn(lines);
        let worker = stream.worker.abort_handle();

        assert!(stream.rx.recv().await.is_some());
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        assert!(!worker.is_finished(), "worker should be blocked on a full channel");

        drop(stream);
        for _ in 0..8 {
            if worker.is_finished() {
                break;
            }
            tokio::task::yield_now().await;
        }
        assert!(worker.is_finished());
    }
}
