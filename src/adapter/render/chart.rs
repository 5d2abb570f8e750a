//! Portfolio charts drawn with plotters into an in-memory bitmap and encoded as PNG.

use std::collections::HashMap;
use std::io::Cursor;

use chrono::{Duration, NaiveDate};
use image::{ImageFormat, RgbImage};
use plotters::coord::ranged1d::{IntoSegmentedCoord, SegmentValue};
use plotters::prelude::*;

use crate::domain::{Distribution, PortfolioReport, PriceTable};
use crate::error::RenderError;

use super::text::{format_eur, format_pct};

const WIDTH: u32 = 1200;
const FONT: &str = "sans-serif";
const MAX_TABLE_ROWS: usize = 15;
const MAX_LABEL_CHARS: usize = 40;
const TREND_LOOKBACK_DAYS: i64 = 365;

const PALETTE: [RGBColor; 10] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
    RGBColor(188, 189, 34),
    RGBColor(23, 190, 207),
];
const HEADER: RGBColor = RGBColor(64, 114, 196);
const STRIPE: RGBColor = RGBColor(242, 242, 242);

fn chart_err<E: std::fmt::Display>(e: E) -> RenderError {
    RenderError::Chart(e.to_string())
}

fn color(i: usize) -> RGBColor {
    PALETTE[i % PALETTE.len()]
}

fn truncate(label: &str) -> String {
    if label.chars().count() <= MAX_LABEL_CHARS {
        label.to_string()
    } else {
        let mut short: String = label.chars().take(MAX_LABEL_CHARS - 1).collect();
        short.push('…');
        short
    }
}

/// Allocate an RGB buffer, let `draw` fill it, and encode the result.
fn render<F>(height: u32, draw: F) -> Result<Vec<u8>, RenderError>
where
    F: FnOnce(&DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>) -> Result<(), RenderError>,
{
    let mut buffer = vec![0u8; WIDTH as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (WIDTH, height)).into_drawing_area();
        root.fill(&WHITE).map_err(chart_err)?;
        draw(&root)?;
        root.present().map_err(chart_err)?;
    }

    let image = RgbImage::from_raw(WIDTH, height, buffer)
        .ok_or_else(|| RenderError::Encode("bitmap size mismatch".into()))?;
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| RenderError::Encode(e.to_string()))?;
    Ok(out.into_inner())
}

/// Holdings as a striped table: name, ticker, current value, net return and CAGR.
pub fn holdings_table(report: &PortfolioReport) -> Result<Vec<u8>, RenderError> {
    if report.holdings.is_empty() {
        return Err(RenderError::NoData("No holdings to show"));
    }

    const ROW_HEIGHT: i32 = 40;
    const TITLE_HEIGHT: i32 = 70;
    let columns: [(&str, i32); 5] = [
        ("Name", 20),
        ("Ticker", 560),
        ("Current value", 720),
        ("Net return %", 900),
        ("CAGR %", 1060),
    ];

    let rows: Vec<[String; 5]> = report
        .holdings
        .iter()
        .take(MAX_TABLE_ROWS)
        .map(|h| {
            [
                truncate(&h.name),
                h.ticker.clone(),
                format_eur(h.metrics.current_value),
                format_pct(h.metrics.net_return_pct),
                format_pct(h.metrics.cagr_pct),
            ]
        })
        .collect();

    let height = (TITLE_HEIGHT + ROW_HEIGHT * (rows.len() as i32 + 1) + 20) as u32;
    render(height, |root| {
        let title = (FONT, 28).into_font().style(FontStyle::Bold).color(&BLACK);
        root.draw(&Text::new("Investment Portfolio", (20, 20), title))
            .map_err(chart_err)?;

        let width = WIDTH as i32;
        let header_y = TITLE_HEIGHT;
        root.draw(&Rectangle::new(
            [(0, header_y), (width, header_y + ROW_HEIGHT)],
            HEADER.filled(),
        ))
        .map_err(chart_err)?;
        let header_font = (FONT, 18).into_font().style(FontStyle::Bold).color(&WHITE);
        for (label, x) in columns {
            root.draw(&Text::new(label, (x, header_y + 10), header_font.clone()))
                .map_err(chart_err)?;
        }

        let cell_font = (FONT, 17).into_font().color(&BLACK);
        for (i, row) in rows.iter().enumerate() {
            let y = header_y + ROW_HEIGHT * (i as i32 + 1);
            if i % 2 == 1 {
                root.draw(&Rectangle::new([(0, y), (width, y + ROW_HEIGHT)], STRIPE.filled()))
                    .map_err(chart_err)?;
            }
            for (cell, (_, x)) in row.iter().zip(columns) {
                root.draw(&Text::new(cell.as_str(), (x, y + 10), cell_font.clone()))
                    .map_err(chart_err)?;
            }
        }
        Ok(())
    })
}

/// Horizontal bars sorted ascending, so the largest ends up on top.
fn horizontal_bars(
    title: &str,
    x_desc: &str,
    bars: &[(String, f64)],
    value_label: impl Fn(f64) -> String,
    axis_label: impl Fn(f64) -> String,
) -> Result<Vec<u8>, RenderError> {
    let height = (bars.len() as u32 * 50 + 200).max(500);
    let max = bars.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max) * 1.15;

    render(height, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(title, (FONT, 28).into_font().style(FontStyle::Bold))
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(380)
            .build_cartesian_2d(0.0..max, (0..bars.len()).into_segmented())
            .map_err(chart_err)?;

        let y_label = |v: &SegmentValue<usize>| match v {
            SegmentValue::CenterOf(i) => bars.get(*i).map(|(l, _)| truncate(l)).unwrap_or_default(),
            _ => String::new(),
        };
        let x_label = |v: &f64| axis_label(*v);
        chart
            .configure_mesh()
            .disable_y_mesh()
            .y_labels(bars.len())
            .y_label_formatter(&y_label)
            .x_label_formatter(&x_label)
            .x_desc(x_desc)
            .label_style((FONT, 16))
            .draw()
            .map_err(chart_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                let mut bar = Rectangle::new(
                    [(0.0, SegmentValue::Exact(i)), (*value, SegmentValue::Exact(i + 1))],
                    color(i).mix(0.8).filled(),
                );
                bar.set_margin(8, 8, 0, 0);
                bar
            }))
            .map_err(chart_err)?;

        chart
            .draw_series(bars.iter().enumerate().map(|(i, (_, value))| {
                Text::new(
                    value_label(*value),
                    (*value + max * 0.01, SegmentValue::CenterOf(i)),
                    (FONT, 15).into_font().style(FontStyle::Bold),
                )
            }))
            .map_err(chart_err)?;
        Ok(())
    })
}

/// Current value per holding, labelled with its share of the portfolio.
pub fn composition_chart(report: &PortfolioReport) -> Result<Vec<u8>, RenderError> {
    let total = report.total.current_value;
    if report.holdings.is_empty() || total <= 0.0 {
        return Err(RenderError::NoData("No holdings to chart"));
    }

    let mut bars: Vec<(String, f64)> = report
        .holdings
        .iter()
        .map(|h| (h.name.clone(), h.metrics.current_value))
        .collect();
    bars.sort_by(|a, b| a.1.total_cmp(&b.1));

    horizontal_bars(
        "Portfolio Composition by Current Value",
        "Current value (€)",
        &bars,
        |v| format!("{:.1}%", v / total * 100.0),
        |v| format!("€ {v:.0}"),
    )
}

/// Buckets of a distribution as percentage bars.
pub fn distribution_chart(title: &str, distribution: &Distribution) -> Result<Vec<u8>, RenderError> {
    if distribution.is_empty() {
        return Err(RenderError::NoData("No distribution data available"));
    }

    let mut bars: Vec<(String, f64)> = distribution
        .buckets
        .iter()
        .map(|(label, share)| (label.clone(), share * 100.0))
        .collect();
    bars.sort_by(|a, b| a.1.total_cmp(&b.1));

    horizontal_bars(
        title,
        "Share of portfolio (%)",
        &bars,
        |v| format!("{v:.1}%"),
        |v| format!("{v:.0}%"),
    )
}

/// Price lines rebased to 100 at the first close of the last year.
pub fn trend_chart(
    prices: &PriceTable,
    names: &HashMap<String, String>,
    today: NaiveDate,
) -> Result<Vec<u8>, RenderError> {
    let since = today - Duration::days(TREND_LOOKBACK_DAYS);

    let mut lines: Vec<(String, Vec<(NaiveDate, f64)>)> = prices
        .iter()
        .filter_map(|(ticker, series)| {
            let base = series.first_on_or_after(since).or_else(|| series.first())?;
            if base.close == 0.0 {
                return None;
            }
            let points = series
                .points()
                .iter()
                .map(|p| (p.date, p.close / base.close * 100.0))
                .collect();
            let name = names.get(ticker).cloned().unwrap_or_else(|| ticker.clone());
            Some((name, points))
        })
        .collect();
    if lines.is_empty() {
        return Err(RenderError::NoData("No price history to chart"));
    }
    lines.sort_by(|a, b| a.0.cmp(&b.0));

    let all = lines.iter().flat_map(|(_, points)| points.iter());
    let (mut start, mut end) = (NaiveDate::MAX, NaiveDate::MIN);
    let (mut low, mut high) = (f64::MAX, f64::MIN);
    for (date, value) in all {
        start = start.min(*date);
        end = end.max(*date);
        low = low.min(*value);
        high = high.max(*value);
    }
    let span = (end - start).num_days().max(1) as f64;
    let pad = ((high - low) * 0.05).max(1.0);

    render(800, |root| {
        let mut chart = ChartBuilder::on(root)
            .caption(
                "Normalised Price Trend (base 100 = one year ago)",
                (FONT, 28).into_font().style(FontStyle::Bold),
            )
            .margin(20)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..span, (low - pad)..(high + pad))
            .map_err(chart_err)?;

        let x_label = |x: &f64| (start + Duration::days(*x as i64)).format("%Y-%m").to_string();
        chart
            .configure_mesh()
            .x_labels(8)
            .x_label_formatter(&x_label)
            .x_desc("Date")
            .y_desc("Normalised price (base 100)")
            .label_style((FONT, 16))
            .draw()
            .map_err(chart_err)?;

        for (i, (name, points)) in lines.iter().enumerate() {
            let stroke = color(i).stroke_width(2);
            chart
                .draw_series(LineSeries::new(
                    points
                        .iter()
                        .map(|(date, value)| ((*date - start).num_days() as f64, *value)),
                    stroke,
                ))
                .map_err(chart_err)?
                .label(truncate(name))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], stroke));
        }

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.85))
            .border_style(BLACK)
            .label_font((FONT, 15))
            .draw()
            .map_err(chart_err)?;
        Ok(())
    })
}
