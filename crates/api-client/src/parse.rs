// In crates/api-client/src/parse.rs

use chrono::NaiveDate;
use core_types::{DateRange, Market, PricePoint, PriceSeries};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::types::{DAILY_SERIES_KEY, RawDailyResponse};

/// The close field of the current response schema, quoted in the market currency.
const CLOSE_FIELD: &str = "4. close";

/// Fails with `DataUnavailable` when the provider answered with a message
/// instead of data.
pub fn check_api_error(response: &RawDailyResponse) -> Result<()> {
    let notice = [
        ("Error Message", &response.error_message),
        ("Note", &response.note),
        ("Information", &response.information),
    ]
    .into_iter()
    .find_map(|(label, text)| text.as_ref().map(|text| (label, text)));

    match notice {
        Some((label, text)) => Err(Error::DataUnavailable(format!("{label}: {text}"))),
        None => Ok(()),
    }
}

/// Extracts the daily closing prices quoted in `market` for the days in `range`.
///
/// Prefers the market-specific `4a. close (MARKET)` field of the older schema
/// and falls back to `4. close`. Entries outside `range` are skipped without
/// being read, so a bad price elsewhere in the history cannot fail the fetch.
pub fn parse_daily_closes(
    response: &RawDailyResponse,
    market: &Market,
    range: &DateRange,
) -> Result<BTreeMap<NaiveDate, Decimal>> {
    check_api_error(response)?;

    let series = response.time_series.as_ref().ok_or_else(|| {
        Error::DataUnavailable(format!("response has no `{DAILY_SERIES_KEY}` object"))
    })?;
    let market_field = format!("4a. close ({})", market.0);

    let mut closes = BTreeMap::new();
    for (raw_date, fields) in series {
        let Ok(date) = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d") else {
            tracing::debug!(key = %raw_date, "Skipping series entry with an unreadable date.");
            continue;
        };
        if !range.contains(date) {
            continue;
        }
        let raw_close = fields
            .get(&market_field)
            .or_else(|| fields.get(CLOSE_FIELD))
            .ok_or_else(|| {
                Error::DataUnavailable(format!("no close price for {date} in market {market}"))
            })?;
        let close = Decimal::from_str(raw_close.trim()).map_err(|e| {
            Error::DataUnavailable(format!("invalid close price `{raw_close}` for {date}: {e}"))
        })?;
        closes.insert(date, close);
    }

    Ok(closes)
}

/// Builds the series for `range`, requiring a close for every calendar day.
///
/// Prices outside the range are ignored. Every missing day is listed in the
/// `IncompleteSeries` error.
pub fn assemble_series(
    closes: &BTreeMap<NaiveDate, Decimal>,
    range: &DateRange,
) -> Result<PriceSeries> {
    let mut points = Vec::with_capacity(range.num_days());
    let mut missing = Vec::new();

    for day in range.days() {
        match closes.get(&day) {
            Some(close) => points.push(PricePoint::new(day, *close)),
            None => missing.push(day),
        }
    }

    if !missing.is_empty() {
        return Err(Error::IncompleteSeries { missing });
    }

    Ok(PriceSeries::new(points)?)
}
