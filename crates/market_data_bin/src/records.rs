use bar_model::{Bar, Granularity, MarketDataRecord};
use yahoo_api::api::History;

const DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Flattens upstream history into the frontend record shape. Order and
/// cardinality match the upstream bars one to one.
pub fn to_records(history: &History) -> Vec<MarketDataRecord> {
    history
        .bars
        .iter()
        .map(|bar| to_record(bar, history.granularity))
        .collect()
}

fn to_record(bar: &Bar, granularity: Granularity) -> MarketDataRecord {
    let ts = match granularity {
        // date-keyed rows render with the time defaulted to midnight
        Granularity::Daily => bar.ts.date().and_hms_opt(0, 0, 0).unwrap_or(bar.ts),
        Granularity::Intraday => bar.ts,
    };

    MarketDataRecord {
        date: ts.format(DATE_FORMAT).to_string(),
        open: bar.open,
        high: bar.high,
        low: bar.low,
        close: bar.close,
        volume: bar.volume,
    }
}
