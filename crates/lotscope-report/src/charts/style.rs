//! Shared drawing helpers for the report charts.

use std::path::Path;

use anyhow::Result;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, IntoDrawingArea, Rectangle,
};
use plotters::style::{Color, RGBColor, WHITE};

/// All charts render at the same raster size.
pub(crate) const CHART_SIZE: (u32, u32) = (1280, 720);

pub(crate) const BAR_FILL: RGBColor = RGBColor(46, 134, 171);

/// Maps a fraction in [0, 1] to a white-to-blue heat color.
pub(crate) fn heat_color(fraction: f64) -> RGBColor {
    let f = fraction.clamp(0.0, 1.0);
    let blend = |from: f64, to: f64| (from + (to - from) * f) as u8;
    RGBColor(blend(255.0, 33.0), blend(255.0, 74.0), blend(255.0, 135.0))
}

/// Maps a correlation in [-1, 1] to a blue-white-red diverging color.
pub(crate) fn diverging_color(value: f64) -> RGBColor {
    let v = value.clamp(-1.0, 1.0);
    if v < 0.0 {
        let f = -v;
        let blend = |from: f64, to: f64| (from + (to - from) * f) as u8;
        RGBColor(blend(255.0, 33.0), blend(255.0, 74.0), blend(255.0, 135.0))
    } else {
        let blend = |from: f64, to: f64| (from + (to - from) * v) as u8;
        RGBColor(blend(255.0, 199.0), blend(255.0, 62.0), blend(255.0, 29.0))
    }
}

/// Vertical bar chart over labeled categories.
pub(crate) fn bar_chart(
    path: &Path,
    caption: &str,
    x_desc: &str,
    y_desc: &str,
    labels: &[String],
    values: &[f64],
) -> Result<()> {
    if labels.is_empty() {
        anyhow::bail!("nothing to plot");
    }
    let y_max = values.iter().copied().fold(0.0f64, f64::max).max(1.0) * 1.1;
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(0..labels.len() as i32, 0f64..y_max)?;

    let tick_labels = labels.to_vec();
    chart
        .configure_mesh()
        .x_desc(x_desc)
        .y_desc(y_desc)
        .x_labels(labels.len().min(30))
        .x_label_formatter(&move |x| {
            tick_labels
                .get(*x as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    chart.draw_series(values.iter().enumerate().map(|(idx, value)| {
        Rectangle::new(
            [(idx as i32, 0.0), (idx as i32 + 1, *value)],
            BAR_FILL.filled(),
        )
    }))?;

    root.present()?;
    Ok(())
}
