//! Annotated correlation-matrix grid.

use std::path::Path;

use anyhow::Result;
use plotters::element::Text;
use plotters::prelude::{BitMapBackend, ChartBuilder, IntoDrawingArea, Rectangle};
use plotters::style::{BLACK, Color, IntoFont, WHITE};

use crate::correlation::CorrelationMatrix;

use super::style::{CHART_SIZE, diverging_color};

pub(crate) fn correlation_grid(matrix: &CorrelationMatrix, path: &Path) -> Result<()> {
    let n = matrix.labels.len();
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Correlation Matrix of Numerical Features", ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(80)
        .y_label_area_size(100)
        .build_cartesian_2d(0..n as i32, 0..n as i32)?;

    let x_labels = matrix.labels.clone();
    let y_labels = matrix.labels.clone();
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(n)
        .y_labels(n)
        .x_label_formatter(&move |x| x_labels.get(*x as usize).cloned().unwrap_or_default())
        .y_label_formatter(&move |y| y_labels.get(*y as usize).cloned().unwrap_or_default())
        .draw()?;

    for (i, row) in matrix.values.iter().enumerate() {
        for (j, value) in row.iter().enumerate() {
            let fill = match value {
                Some(v) => diverging_color(*v),
                None => WHITE,
            };
            chart.draw_series(std::iter::once(Rectangle::new(
                [(j as i32, i as i32), (j as i32 + 1, i as i32 + 1)],
                fill.filled(),
            )))?;
            let annotation = match value {
                Some(v) => format!("{v:.2}"),
                None => "-".to_string(),
            };
            chart.draw_series(std::iter::once(Text::new(
                annotation,
                (j as i32, i as i32),
                ("sans-serif", 16).into_font().color(&BLACK),
            )))?;
        }
    }

    root.present()?;
    Ok(())
}
