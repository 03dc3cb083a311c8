use bar_model::{Bar, Granularity};
use chrono::DateTime;
use log::debug;
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;

const YAHOO_BASE_API_URL: &str = "https://query1.finance.yahoo.com";
const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);
// yahoo rejects requests without a browser-like user agent
const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:109.0) Gecko/20100101 Firefox/118.0";

#[derive(Debug, Deserialize)]
struct ChartJSON {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartErrorJSON>,
}

#[derive(Debug, Deserialize)]
struct ChartErrorJSON {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    timestamp: Option<Vec<Option<i64>>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "dataGranularity")]
    data_granularity: String,
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<Quote>,
    adjclose: Option<Vec<AdjClose>>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

#[derive(Debug, Deserialize)]
struct AdjClose {
    adjclose: Vec<Option<f64>>,
}

/// Upstream history for one symbol: the bars in upstream order plus whether
/// the rows were keyed by date or by datetime.
#[derive(Debug)]
pub struct History {
    pub bars: Vec<Bar>,
    pub granularity: Granularity,
}

#[derive(Debug)]
pub enum YahooError {
    NoData { symbol: String },
    Request(reqwest::Error),
    BadStatus(u16),
    BadSchema(String),
}

impl fmt::Display for YahooError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            YahooError::NoData { symbol } => write!(f, "no data for symbol '{}'", symbol),
            YahooError::Request(e) => write!(f, "upstream request failed: {}", e),
            YahooError::BadStatus(code) => write!(f, "upstream returned status {}", code),
            YahooError::BadSchema(msg) => write!(f, "unexpected upstream schema: {}", msg),
        }
    }
}

impl Error for YahooError {}

impl From<reqwest::Error> for YahooError {
    fn from(err: reqwest::Error) -> YahooError {
        YahooError::Request(err)
    }
}

#[derive(Clone)]
pub struct YahooAPI {
    base_url: String,
    client: reqwest::Client,
}

impl YahooAPI {
    pub fn new() -> Self {
        return YahooAPI::with_base_url(YAHOO_BASE_API_URL.to_string());
    }

    pub fn with_base_url(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(UPSTREAM_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");
        return YahooAPI { base_url, client };
    }

    /// Fetches historical bars for one symbol, adjusted for splits and
    /// dividends. An empty result set is an explicit `NoData` error.
    pub async fn get_history(
        &self,
        symbol: &str,
        interval: &str,
        period: &str,
    ) -> Result<History, YahooError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);

        debug!(
            "get_history | symbol: {} | interval: {} | period: {}",
            symbol, interval, period
        );

        let response = self
            .client
            .get(&url)
            .query(&[
                ("range", period),
                ("interval", interval),
                ("events", "div,split"),
                ("includeAdjustedClose", "true"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            // yahoo answers 404 for unknown or delisted symbols
            return Err(YahooError::NoData {
                symbol: symbol.to_string(),
            });
        }
        if !status.is_success() {
            return Err(YahooError::BadStatus(status.as_u16()));
        }

        let json = response.json::<ChartJSON>().await?;

        if let Some(err) = json.chart.error {
            if err.code.eq_ignore_ascii_case("not found") {
                return Err(YahooError::NoData {
                    symbol: symbol.to_string(),
                });
            }
            return Err(YahooError::BadSchema(format!(
                "{}: {}",
                err.code, err.description
            )));
        }

        let result = json
            .chart
            .result
            .and_then(|mut results| {
                if results.is_empty() {
                    None
                } else {
                    Some(results.remove(0))
                }
            })
            .ok_or_else(|| YahooError::NoData {
                symbol: symbol.to_string(),
            })?;

        let granularity = parse_granularity(&result.meta.data_granularity)?;
        let bars = collect_bars(&result)?;

        if bars.is_empty() {
            return Err(YahooError::NoData {
                symbol: symbol.to_string(),
            });
        }

        Ok(History { bars, granularity })
    }
}

fn parse_granularity(data_granularity: &str) -> Result<Granularity, YahooError> {
    match data_granularity {
        "1m" | "2m" | "5m" | "15m" | "30m" | "60m" | "90m" | "1h" | "4h" => {
            Ok(Granularity::Intraday)
        }
        "1d" | "5d" | "1wk" | "1mo" | "3mo" => Ok(Granularity::Daily),
        other => Err(YahooError::BadSchema(format!(
            "unknown data granularity '{}'",
            other
        ))),
    }
}

fn collect_bars(result: &ChartResult) -> Result<Vec<Bar>, YahooError> {
    let timestamps = result.timestamp.as_deref().unwrap_or(&[]);
    let quote = result
        .indicators
        .quote
        .first()
        .ok_or_else(|| YahooError::BadSchema("missing quote series".to_string()))?;
    let adjclose = result.indicators.adjclose.as_deref().and_then(|a| a.first());

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, ts) in timestamps.iter().enumerate() {
        let (Some(ts), Some(open), Some(high), Some(low), Some(close)) = (
            *ts,
            value_at(&quote.open, i),
            value_at(&quote.high, i),
            value_at(&quote.low, i),
            value_at(&quote.close, i),
        ) else {
            // untraded slot, upstream fills these with nulls
            continue;
        };

        // auto-adjust ohlc for splits/dividends via the adjusted close ratio;
        // intraday responses carry no adjclose series and pass through
        let ratio = match adjclose.and_then(|a| value_at(&a.adjclose, i)) {
            Some(adj) if close != 0.0 => adj / close,
            _ => 1.0,
        };

        let local = ts
            .checked_add(result.meta.gmtoffset)
            .and_then(|shifted| DateTime::from_timestamp(shifted, 0))
            .ok_or_else(|| YahooError::BadSchema(format!("timestamp {} out of range", ts)))?
            .naive_utc();

        bars.push(Bar {
            ts: local,
            open: open * ratio,
            high: high * ratio,
            low: low * ratio,
            close: close * ratio,
            volume: value_at(&quote.volume, i).unwrap_or_default(),
        });
    }

    Ok(bars)
}

fn value_at<T: Copy>(series: &[Option<T>], i: usize) -> Option<T> {
    series.get(i).copied().flatten()
}
