// In crates/charting/src/lib.rs

use chrono::NaiveDate;
use core_types::{Signal, SignalRow};
use num_traits::cast::ToPrimitive;
use plotters::prelude::*;
use rust_decimal::Decimal;
use std::path::Path;
use strategies::crossover_events;

pub mod error;

pub use error::{Error, Result};

/// Size and labelling of the rendered chart.
#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    pub title: String,
    /// Legend labels of the two averages (e.g., "SMA 3 days").
    pub short_label: String,
    pub long_label: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1500,
            height: 1000,
            title: "Closing price and moving averages".into(),
            short_label: "SMA short".into(),
            long_label: "SMA long".into(),
        }
    }
}

fn render_err<E: std::fmt::Display>(e: E) -> Error {
    Error::Render(e.to_string())
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(f64::NAN)
}

/// Renders the signal table as an SVG chart at `output_path`.
///
/// Plots the closing price and both averages against date, with a green
/// triangle at each bullish crossover and a red cross at each bearish one.
/// Parent directories are created as needed.
pub fn render(rows: &[SignalRow], output_path: &Path, options: &ChartOptions) -> Result<()> {
    let (first, last) = match (rows.first(), rows.last()) {
        (Some(first), Some(last)) => (first.date, last.date),
        _ => return Err(Error::EmptySeries),
    };
    // A single day still needs a non-empty x axis.
    let last = if last > first { last } else { last.succ_opt().unwrap_or(last) };

    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(render_err)?;
    }

    let (y_min, y_max) = value_bounds(rows);
    let root = SVGBackend::new(output_path, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(render_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(&options.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(90)
        .build_cartesian_2d(first..last, y_min..y_max)
        .map_err(render_err)?;

    chart
        .configure_mesh()
        .x_labels(12)
        .y_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m-%d").to_string())
        .draw()
        .map_err(render_err)?;

    let price_style = BLUE.mix(0.35).stroke_width(1);
    chart
        .draw_series(LineSeries::new(
            rows.iter().map(|r| (r.date, to_f64(r.closing_price))),
            price_style,
        ))
        .map_err(render_err)?
        .label("Closing price")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], price_style));

    let short_style = MAGENTA.stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            rows.iter().filter_map(|r| r.sma_short.map(|v| (r.date, to_f64(v)))),
            short_style,
        ))
        .map_err(render_err)?
        .label(options.short_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], short_style));

    let long_style = BLACK.stroke_width(2);
    chart
        .draw_series(LineSeries::new(
            rows.iter().filter_map(|r| r.sma_long.map(|v| (r.date, to_f64(v)))),
            long_style,
        ))
        .map_err(render_err)?
        .label(options.long_label.as_str())
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], long_style));

    let events = crossover_events(rows);
    chart
        .draw_series(
            events
                .iter()
                .filter(|e| e.signal == Signal::Buy)
                .map(|e| TriangleMarker::new((e.date, to_f64(e.sma_short)), 9, GREEN.filled())),
        )
        .map_err(render_err)?
        .label("BUY")
        .legend(|(x, y)| TriangleMarker::new((x + 10, y), 6, GREEN.filled()));
    chart
        .draw_series(
            events
                .iter()
                .filter(|e| e.signal == Signal::Sell)
                .map(|e| Cross::new((e.date, to_f64(e.sma_short)), 7, RED.stroke_width(3))),
        )
        .map_err(render_err)?
        .label("SELL")
        .legend(|(x, y)| Cross::new((x + 10, y), 5, RED.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(render_err)?;

    root.present().map_err(render_err)?;
    tracing::info!(
        path = %output_path.display(),
        rows = rows.len(),
        crossovers = events.len(),
        "Chart written."
    );
    Ok(())
}

/// The y-axis range covering every plotted value, with a little headroom.
fn value_bounds(rows: &[SignalRow]) -> (f64, f64) {
    let values = rows
        .iter()
        .flat_map(|r| [Some(r.closing_price), r.sma_short, r.sma_long])
        .flatten()
        .map(to_f64)
        .filter(|v| v.is_finite());

    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }

    let pad = if max > min { (max - min) * 0.05 } else { min.abs().max(1.0) * 0.05 };
    (min - pad, max + pad)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{PricePoint, PriceSeries};
    use rust_decimal_macros::dec;
    use strategies::compute_signals;

    fn rows_from(closes: &[i64]) -> Vec<SignalRow> {
        let start = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let points = start
            .iter_days()
            .zip(closes)
            .map(|(date, close)| PricePoint::new(date, Decimal::from(*close)))
            .collect();
        compute_signals(&PriceSeries::new(points).unwrap(), 2, 4).unwrap()
    }

    #[test]
    fn writes_an_svg_with_all_series() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("charts").join("btc.svg");
        let rows = rows_from(&[10, 20, 30, 40, 50, 60, 50, 40, 30, 20, 10, 15, 25]);

        render(&rows, &path, &ChartOptions::default()).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("SMA short"));
        assert!(svg.contains("Closing price"));
    }

    #[test]
    fn single_row_still_renders() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.svg");
        render(&rows_from(&[42]), &path, &ChartOptions::default()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn empty_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = render(&[], &dir.path().join("empty.svg"), &ChartOptions::default()).unwrap_err();
        assert!(matches!(err, Error::EmptySeries));
    }

    #[test]
    fn unwritable_location_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "plain file").unwrap();

        let err = render(&rows_from(&[1, 2, 3]), &blocker.join("chart.svg"), &ChartOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Render(_)));
    }

    #[test]
    fn bounds_cover_prices_and_averages() {
        let rows = rows_from(&[100, 200, 300]);
        let (lo, hi) = value_bounds(&rows);
        assert!(lo < 100.0 && hi > 300.0);

        let flat = vec![SignalRow {
            date: NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
            closing_price: dec!(5),
            sma_short: None,
            sma_long: None,
            signal: Signal::None,
        }];
        let (lo, hi) = value_bounds(&flat);
        assert!(lo < 5.0 && hi > 5.0);
    }
}
