//! Pre-cleaning charts: missing-value bar chart and heatmap.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::{BitMapBackend, ChartBuilder, IntoDrawingArea, Rectangle};
use plotters::style::{Color, WHITE};
use polars::prelude::DataFrame;

use lotscope_ingest::{ColumnProfile, missing_mask};

use super::style::{CHART_SIZE, bar_chart, heat_color};

/// Maximum number of row bands in the heatmap grid.
const HEATMAP_BANDS: usize = 200;

/// Missing count per column, descending; columns without gaps are omitted.
pub(crate) fn missing_values_bar(profiles: &[ColumnProfile], path: &Path) -> Result<()> {
    let mut with_missing: Vec<&ColumnProfile> =
        profiles.iter().filter(|p| p.missing > 0).collect();
    with_missing.sort_by(|a, b| b.missing.cmp(&a.missing));

    let labels: Vec<String> = with_missing.iter().map(|p| p.name.clone()).collect();
    let values: Vec<f64> = with_missing.iter().map(|p| p.missing as f64).collect();
    bar_chart(
        path,
        "Missing Values by Column",
        "Column",
        "Missing values",
        &labels,
        &values,
    )
}

/// Missingness grid over the raw table: columns on x, banded rows on y,
/// each cell shaded by its missing fraction.
pub(crate) fn missing_values_heatmap(raw: &DataFrame, path: &Path) -> Result<()> {
    let mask = missing_mask(raw);
    let rows = mask.len();
    let columns = raw.width();
    let bands = rows.min(HEATMAP_BANDS).max(1);

    // fraction of missing cells per (band, column)
    let mut grid = vec![vec![(0usize, 0usize); columns]; bands];
    for (row_idx, row) in mask.iter().enumerate() {
        let band = row_idx * bands / rows.max(1);
        for (col_idx, missing) in row.iter().enumerate() {
            let cell = &mut grid[band][col_idx];
            cell.1 += 1;
            if *missing {
                cell.0 += 1;
            }
        }
    }

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let column_labels: Vec<String> = raw
        .get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect();
    let mut chart = ChartBuilder::on(&root)
        .caption("Missing Values Heatmap", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..columns as i32, 0..bands as i32)?;

    let tick_labels = column_labels;
    chart
        .configure_mesh()
        .x_desc("Column")
        .y_desc("Row band")
        .x_labels(columns.min(30))
        .x_label_formatter(&move |x| {
            tick_labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(grid.iter().enumerate().flat_map(|(band, cells)| {
        cells.iter().enumerate().map(move |(col, (missing, total))| {
            let fraction = if *total == 0 {
                0.0
            } else {
                *missing as f64 / *total as f64
            };
            Rectangle::new(
                [(col as i32, band as i32), (col as i32 + 1, band as i32 + 1)],
                heat_color(fraction).filled(),
            )
        })
    }))?;

    root.present()?;
    Ok(())
}
