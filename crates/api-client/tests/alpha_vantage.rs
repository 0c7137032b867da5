//! Tests for the Alpha Vantage client against a local stand-in server.

use std::collections::HashMap;

use api_client::{AlphaVantageClient, Error, PriceRequest, PriceSeriesProvider};
use app_config::ProviderSettings;
use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use chrono::NaiveDate;
use core_types::{DateRange, Market, Symbol};
use rust_decimal_macros::dec;
use serde_json::{json, Map, Value};

const TEST_KEY: &str = "test-key";

fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// A daily response with a GBP close of `100 + n` on the n-th day after `start`.
fn daily_body(start: NaiveDate, days: usize, skip: Option<NaiveDate>) -> String {
    let mut series = Map::new();
    for (n, date) in start.iter_days().take(days).enumerate() {
        if Some(date) == skip {
            continue;
        }
        series.insert(
            date.format("%Y-%m-%d").to_string(),
            json!({
                "4a. close (GBP)": format!("{}.50000000", 100 + n),
                "4b. close (USD)": "1.00000000"
            }),
        );
    }
    json!({
        "Meta Data": { "2. Digital Currency Code": "BTC", "4. Market Code": "GBP" },
        "Time Series (Digital Currency Daily)": Value::Object(series)
    })
    .to_string()
}

/// Serves `body` on `/query` when the expected parameters are present.
async fn serve(status: StatusCode, body: String) -> String {
    let app = Router::new().route(
        "/query",
        get(move |Query(params): Query<HashMap<String, String>>| async move {
            let expected = [
                ("function", "DIGITAL_CURRENCY_DAILY"),
                ("symbol", "BTC"),
                ("market", "GBP"),
                ("apikey", TEST_KEY),
            ];
            let matches = expected
                .iter()
                .all(|(k, v)| params.get(*k).map(String::as_str) == Some(*v));
            if matches {
                (status, body)
            } else {
                (StatusCode::BAD_REQUEST, format!("unexpected query: {params:?}"))
            }
        }),
    );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/")
}

fn client(base_url: String) -> AlphaVantageClient {
    let settings = ProviderSettings {
        base_url,
        timeout_secs: 5,
        ..ProviderSettings::default()
    };
    AlphaVantageClient::with_api_key(&settings, TEST_KEY).unwrap()
}

fn request(start: NaiveDate, end: NaiveDate) -> PriceRequest {
    PriceRequest {
        symbol: Symbol("BTC".into()),
        market: Market("GBP".into()),
        range: DateRange::new(start, end).unwrap(),
    }
}

#[tokio::test]
async fn fetches_a_complete_range() {
    let base_url = serve(StatusCode::OK, daily_body(day(2020, 1, 1), 40, None)).await;
    let client = client(base_url);

    let series = client
        .fetch(&request(day(2020, 1, 5), day(2020, 1, 14)))
        .await
        .unwrap();

    assert_eq!(series.len(), 10);
    assert_eq!(series.first_date(), Some(day(2020, 1, 5)));
    assert_eq!(series.points()[0].closing_price, dec!(104.5));
    assert_eq!(series.last_date(), Some(day(2020, 1, 14)));
    assert_eq!(client.name(), "AlphaVantage");
}

#[tokio::test]
async fn gap_in_range_is_incomplete_series() {
    let gap = day(2020, 1, 7);
    let base_url = serve(StatusCode::OK, daily_body(day(2020, 1, 1), 40, Some(gap))).await;

    let err = client(base_url)
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 31)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "IncompleteSeries");
    assert!(matches!(err, Error::IncompleteSeries { ref missing } if missing == &vec![gap]));
}

#[tokio::test]
async fn range_beyond_available_history_is_incomplete_series() {
    let base_url = serve(StatusCode::OK, daily_body(day(2020, 1, 1), 10, None)).await;

    let err = client(base_url)
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 12)))
        .await
        .unwrap_err();

    match err {
        Error::IncompleteSeries { missing } => assert_eq!(missing, vec![day(2020, 1, 11), day(2020, 1, 12)]),
        other => panic!("expected IncompleteSeries, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_is_data_unavailable() {
    let base_url = serve(StatusCode::SERVICE_UNAVAILABLE, "down".into()).await;

    let err = client(base_url)
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 2)))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "DataUnavailable");
    assert!(err.to_string().contains("503"), "{err}");
}

#[tokio::test]
async fn throttling_note_is_data_unavailable() {
    let body = json!({ "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute." });
    let base_url = serve(StatusCode::OK, body.to_string()).await;

    let err = client(base_url)
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 2)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DataUnavailable(ref msg) if msg.starts_with("Note:")));
}

#[tokio::test]
async fn malformed_body_is_data_unavailable() {
    let base_url = serve(StatusCode::OK, "<html>not json</html>".into()).await;

    let err = client(base_url)
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 2)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::DeserializationFailed(_)));
    assert_eq!(err.kind(), "DataUnavailable");
}

#[tokio::test]
async fn unreachable_provider_is_data_unavailable_without_leaking_the_key() {
    // Nothing listens on the discard port.
    let err = client("http://127.0.0.1:9".into())
        .fetch(&request(day(2020, 1, 1), day(2020, 1, 2)))
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RequestFailed(_)));
    assert!(!err.to_string().contains(TEST_KEY));
}

#[test]
fn missing_key_is_missing_credential() {
    let settings = ProviderSettings {
        api_key_env: "SMA_CROSSOVER_TEST_UNSET_KEY".into(),
        ..ProviderSettings::default()
    };

    let err = AlphaVantageClient::new(&settings).unwrap_err();
    assert_eq!(err.kind(), "MissingCredential");
    assert!(err.to_string().contains("SMA_CROSSOVER_TEST_UNSET_KEY"));

    let err = AlphaVantageClient::with_api_key(&settings, "  ").unwrap_err();
    assert!(matches!(err, Error::MissingCredential { .. }));
}

#[test]
fn debug_output_redacts_the_key() {
    let client = client("http://localhost".into());
    let rendered = format!("{client:?}");
    assert!(!rendered.contains(TEST_KEY));
    assert!(rendered.contains("redacted"));
}
