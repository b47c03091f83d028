//! Price trend charts: mean price by year and by binned odometer.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, Circle, IntoDrawingArea, LineSeries, PathElement,
};
use plotters::style::{BLACK, BLUE, Color, RED, WHITE};
use polars::prelude::DataFrame;

use lotscope_query::group::{aggregate_groups, f64_values, grouped, string_values};
use lotscope_query::mean;

use crate::bins::BinSpec;
use crate::numeric::linear_fit;

use super::style::CHART_SIZE;

/// Equal-width interval count for the odometer axis.
const ODOMETER_BINS: usize = 20;

/// Mean price per model year with a least-squares trend line.
///
/// Returns the first-to-last relative price change (percent) when a trend
/// exists, for the narrative summary.
pub(crate) fn mean_price_by_year(
    df: &DataFrame,
    price_col: &str,
    year_col: &str,
    path: &Path,
) -> Result<Option<f64>> {
    let years = string_values(df, year_col)?;
    let prices = f64_values(df, price_col)?;
    let mut points: Vec<(f64, f64)> = aggregate_groups(grouped(&years, &prices), mean)
        .into_iter()
        .filter_map(|(year, price)| year.parse::<f64>().ok().map(|y| (y, price)))
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    if points.is_empty() {
        anyhow::bail!("no usable year values");
    }

    let xs: Vec<f64> = points.iter().map(|(year, _)| *year).collect();
    let ys: Vec<f64> = points.iter().map(|(_, price)| *price).collect();
    let trend = linear_fit(&xs, &ys);

    let x_min = xs.first().copied().unwrap_or(0.0);
    let x_max = xs.last().copied().unwrap_or(1.0);
    let y_max = ys.iter().copied().fold(0.0f64, f64::max).max(1.0) * 1.1;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Price by Model Year", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(x_min - 0.5..x_max + 0.5, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Model year")
        .y_desc("Mean price ($)")
        .draw()?;

    chart
        .draw_series(LineSeries::new(points.clone(), &BLUE))?
        .label("mean price")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));
    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 4, BLUE.filled())),
    )?;
    if let Some((slope, intercept)) = trend {
        let line = vec![
            (x_min, slope * x_min + intercept),
            (x_max, slope * x_max + intercept),
        ];
        chart
            .draw_series(LineSeries::new(line, &RED))?
            .label("trend")
            .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()?;
    root.present()?;

    let change = match (ys.first(), ys.last()) {
        (Some(first), Some(last)) if *first != 0.0 => Some((last - first) / first * 100.0),
        _ => None,
    };
    Ok(change)
}

/// Mean price per odometer bin, plotted at bin midpoints.
pub(crate) fn mean_price_by_odometer(
    df: &DataFrame,
    price_col: &str,
    odometer_col: &str,
    path: &Path,
) -> Result<()> {
    let odometers = f64_values(df, odometer_col)?;
    let prices = f64_values(df, price_col)?;
    let mut pairs: Vec<(f64, f64)> = Vec::new();
    for (odometer, price) in odometers.iter().zip(&prices) {
        if let (Some(o), Some(p)) = (odometer, price) {
            pairs.push((*o, *p));
        }
    }
    if pairs.is_empty() {
        anyhow::bail!("no usable odometer/price pairs");
    }

    let observed_min = pairs.iter().map(|(o, _)| *o).fold(f64::INFINITY, f64::min);
    let observed_max = pairs
        .iter()
        .map(|(o, _)| *o)
        .fold(f64::NEG_INFINITY, f64::max);
    let bins = BinSpec::equal_width(observed_min, observed_max, ODOMETER_BINS)
        .ok_or_else(|| anyhow::anyhow!("degenerate odometer range"))?;

    let bin_values: Vec<f64> = pairs.iter().map(|(o, _)| *o).collect();
    let bin_prices: Vec<f64> = pairs.iter().map(|(_, p)| *p).collect();
    let points: Vec<(f64, f64)> = bins
        .bucket(&bin_values, &bin_prices)
        .into_iter()
        .enumerate()
        .filter_map(|(idx, bucket)| mean(&bucket).map(|m| (bins.midpoint(idx), m)))
        .collect();

    let y_max = points
        .iter()
        .map(|(_, p)| *p)
        .fold(0.0f64, f64::max)
        .max(1.0)
        * 1.1;

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let mut chart = ChartBuilder::on(&root)
        .caption("Mean Price by Odometer Reading", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(90)
        .build_cartesian_2d(observed_min..observed_max, 0f64..y_max)?;
    chart
        .configure_mesh()
        .x_desc("Odometer")
        .y_desc("Mean price ($)")
        .draw()?;

    chart.draw_series(LineSeries::new(points.clone(), &BLUE))?;
    chart.draw_series(
        points
            .iter()
            .map(|(x, y)| Circle::new((*x, *y), 5, BLUE.filled())),
    )?;
    root.present()?;
    Ok(())
}
