//! Price-by-color box plots, with and without IQR outlier trimming.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Result;
use plotters::prelude::{
    BitMapBackend, ChartBuilder, Circle, IntoDrawingArea, PathElement, Rectangle,
};
use plotters::style::{BLACK, Color, WHITE};

use lotscope_query::group::{f64_values, string_values};
use polars::prelude::DataFrame;

use crate::numeric::BoxStats;

use super::style::{BAR_FILL, CHART_SIZE};

/// Half-width of a box in slot units.
const BOX_HALF_WIDTH: f64 = 0.3;

/// Half-width of a whisker cap in slot units.
const CAP_HALF_WIDTH: f64 = 0.15;

struct ColorBox {
    label: String,
    stats: BoxStats,
    /// Sorted prices backing the box.
    prices: Vec<f64>,
}

/// Price distribution per exterior color, outliers drawn as points.
pub(crate) fn price_by_color(
    df: &DataFrame,
    price_col: &str,
    color_col: &str,
    path: &Path,
) -> Result<()> {
    let pairs = color_price_pairs(df, price_col, color_col)?;
    let mut boxes = color_boxes(&pairs)?;
    sort_by_median_desc(&mut boxes);
    draw_boxes(&boxes, "Price by Color", path, true)
}

/// Price distribution per exterior color after dropping rows whose price
/// lies outside the 1.5×IQR bounds of the whole price column; bounds are
/// global, not per color, so a small group of extreme prices cannot shield
/// itself behind its own quartiles.
pub(crate) fn price_by_color_trimmed(
    df: &DataFrame,
    price_col: &str,
    color_col: &str,
    path: &Path,
) -> Result<()> {
    let pairs = color_price_pairs(df, price_col, color_col)?;
    let mut untrimmed = color_boxes(&pairs)?;
    sort_by_median_desc(&mut untrimmed);
    let order: Vec<String> = untrimmed.iter().map(|group| group.label.clone()).collect();

    let kept = trim_price_outliers(&pairs);
    let mut trimmed = color_boxes(&kept)?;
    // keep the untrimmed figure's color order so the two stay comparable
    trimmed.sort_by_key(|group| {
        order
            .iter()
            .position(|label| label == &group.label)
            .unwrap_or(usize::MAX)
    });
    draw_boxes(&trimmed, "Price by Color (outliers removed)", path, false)
}

/// Rows of the color subset as `(color, price)` pairs, in table order.
fn color_price_pairs(
    df: &DataFrame,
    price_col: &str,
    color_col: &str,
) -> Result<Vec<(String, f64)>> {
    let colors = string_values(df, color_col)?;
    let prices = f64_values(df, price_col)?;
    Ok(colors
        .into_iter()
        .zip(prices)
        .filter_map(|(color, price)| price.map(|price| (color, price)))
        .collect())
}

/// Keeps the pairs whose price lies inside the 1.5×IQR bounds of the whole
/// price sample. Bounds are inclusive, so boundary prices are retained.
fn trim_price_outliers(pairs: &[(String, f64)]) -> Vec<(String, f64)> {
    let prices: Vec<f64> = pairs.iter().map(|(_, price)| *price).collect();
    let Some(stats) = BoxStats::from_values(&prices) else {
        return pairs.to_vec();
    };
    pairs
        .iter()
        .filter(|(_, price)| stats.within_bounds(*price))
        .cloned()
        .collect()
}

/// One sorted price sample per color, in first-seen color order.
fn color_boxes(pairs: &[(String, f64)]) -> Result<Vec<ColorBox>> {
    let mut groups: Vec<(String, Vec<f64>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();
    for (color, price) in pairs {
        let pos = *index.entry(color.clone()).or_insert_with(|| {
            groups.push((color.clone(), Vec::new()));
            groups.len() - 1
        });
        groups[pos].1.push(*price);
    }

    let mut boxes = Vec::new();
    for (label, mut prices) in groups {
        prices.sort_by(|a, b| a.total_cmp(b));
        if let Some(stats) = BoxStats::from_values(&prices) {
            boxes.push(ColorBox {
                label,
                stats,
                prices,
            });
        }
    }
    if boxes.is_empty() {
        anyhow::bail!("no color groups with prices");
    }
    Ok(boxes)
}

fn sort_by_median_desc(boxes: &mut [ColorBox]) {
    boxes.sort_by(|a, b| b.stats.median.total_cmp(&a.stats.median));
}

fn draw_boxes(boxes: &[ColorBox], caption: &str, path: &Path, mark_outliers: bool) -> Result<()> {
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for group in boxes {
        let (lo, hi) = group.stats.whiskers(&group.prices);
        y_min = y_min.min(lo);
        y_max = y_max.max(hi);
        if mark_outliers {
            for price in &group.prices {
                if !group.stats.within_bounds(*price) {
                    y_min = y_min.min(*price);
                    y_max = y_max.max(*price);
                }
            }
        }
    }
    let pad = ((y_max - y_min) * 0.05).max(1.0);

    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(caption, ("sans-serif", 28))
        .margin(12)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(
            -0.5..boxes.len() as f64 - 0.5,
            (y_min - pad)..(y_max + pad),
        )?;

    let tick_labels: Vec<String> = boxes.iter().map(|group| group.label.clone()).collect();
    chart
        .configure_mesh()
        .x_desc("Color")
        .y_desc("Price ($)")
        .x_labels(boxes.len().min(30))
        .x_label_formatter(&move |x| {
            let slot = x.round();
            if (x - slot).abs() > 0.25 || slot < 0.0 {
                return String::new();
            }
            tick_labels
                .get(slot as usize)
                .cloned()
                .unwrap_or_default()
        })
        .draw()?;

    for (slot, group) in boxes.iter().enumerate() {
        let x = slot as f64;
        let stats = &group.stats;
        let (whisker_lo, whisker_hi) = stats.whiskers(&group.prices);

        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (x - BOX_HALF_WIDTH, stats.q1),
                (x + BOX_HALF_WIDTH, stats.q3),
            ],
            BAR_FILL.mix(0.6).filled(),
        )))?;
        chart.draw_series(std::iter::once(Rectangle::new(
            [
                (x - BOX_HALF_WIDTH, stats.q1),
                (x + BOX_HALF_WIDTH, stats.q3),
            ],
            BLACK,
        )))?;
        // median line plus the whisker stems and caps
        chart.draw_series(
            [
                vec![
                    (x - BOX_HALF_WIDTH, stats.median),
                    (x + BOX_HALF_WIDTH, stats.median),
                ],
                vec![(x, stats.q3), (x, whisker_hi)],
                vec![(x, stats.q1), (x, whisker_lo)],
                vec![
                    (x - CAP_HALF_WIDTH, whisker_hi),
                    (x + CAP_HALF_WIDTH, whisker_hi),
                ],
                vec![
                    (x - CAP_HALF_WIDTH, whisker_lo),
                    (x + CAP_HALF_WIDTH, whisker_lo),
                ],
            ]
            .into_iter()
            .map(|points| PathElement::new(points, BLACK)),
        )?;

        if mark_outliers {
            chart.draw_series(
                group
                    .prices
                    .iter()
                    .filter(|price| !stats.within_bounds(**price))
                    .map(|price| Circle::new((x, *price), 3, BLACK.mix(0.7))),
            )?;
        }
    }

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(entries: &[(&str, f64)]) -> Vec<(String, f64)> {
        entries
            .iter()
            .map(|(color, price)| ((*color).to_string(), *price))
            .collect()
    }

    #[test]
    fn trim_bounds_are_global_across_colors() {
        // A uniform-price color has zero IQR of its own, so only bounds
        // computed over the whole price column can remove it.
        let mut rows: Vec<(String, f64)> = (0..20)
            .map(|i| ("white".to_string(), 90.0 + f64::from(i)))
            .collect();
        rows.extend(pairs(&[
            ("exotic", 1_000_000.0),
            ("exotic", 1_000_000.0),
            ("exotic", 1_000_000.0),
        ]));

        let kept = trim_price_outliers(&rows);
        assert_eq!(kept.len(), 20);
        assert!(kept.iter().all(|(color, _)| color == "white"));

        let boxes = color_boxes(&kept).unwrap();
        assert!(boxes.iter().all(|group| group.label != "exotic"));
    }

    #[test]
    fn boundary_prices_survive_trimming() {
        // Q1 = 100, Q3 = 300 -> bounds [-200, 600]; 600 sits exactly on
        // the upper bound and stays, 700 in the same slot is dropped
        let on_bound = pairs(&[
            ("red", 100.0),
            ("red", 100.0),
            ("red", 100.0),
            ("red", 300.0),
            ("red", 300.0),
            ("red", 300.0),
            ("blue", 600.0),
        ]);
        let kept = trim_price_outliers(&on_bound);
        assert_eq!(kept.len(), 7);
        assert!(kept.iter().any(|(color, price)| color == "blue" && *price == 600.0));

        let mut past_bound = on_bound.clone();
        past_bound[6].1 = 700.0;
        let kept = trim_price_outliers(&past_bound);
        assert_eq!(kept.len(), 6);
        assert!(kept.iter().all(|(color, _)| color == "red"));
    }

    #[test]
    fn trimmed_boxes_keep_the_untrimmed_color_order() {
        let rows = pairs(&[
            ("black", 50.0),
            ("black", 60.0),
            ("white", 200.0),
            ("white", 210.0),
            ("gray", 120.0),
            ("gray", 130.0),
        ]);
        let mut boxes = color_boxes(&rows).unwrap();
        sort_by_median_desc(&mut boxes);
        let order: Vec<&str> = boxes.iter().map(|group| group.label.as_str()).collect();
        assert_eq!(order, vec!["white", "gray", "black"]);
    }
}
