use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One OHLCV bar from the upstream provider, timestamped in exchange-local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    pub ts: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

/// Whether the upstream keyed its rows by date or by full datetime.
/// Daily-and-coarser intervals carry no meaningful time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    Daily,
    Intraday,
}

/// The flat record shape the frontend consumes. Field names are fixed
/// regardless of how the upstream names its columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketDataRecord {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}
