//! Numeric helpers behind the charts: correlation, trend fitting, box stats.

use lotscope_query::{median, quantile_linear};

/// Pearson correlation coefficient of two equal-length samples.
///
/// `None` when fewer than two points or either sample has zero variance.
pub fn pearson(xs: &[f64], ys: &[f64]) -> Option<f64> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        let dy = y - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }
    if var_x == 0.0 || var_y == 0.0 {
        return None;
    }
    Some(cov / (var_x.sqrt() * var_y.sqrt()))
}

/// Degree-1 least-squares fit; returns `(slope, intercept)`.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<(f64, f64)> {
    if xs.len() != ys.len() || xs.len() < 2 {
        return None;
    }
    let n = xs.len() as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;
    let mut cov = 0.0;
    let mut var_x = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x) * (x - mean_x);
    }
    if var_x == 0.0 {
        return None;
    }
    let slope = cov / var_x;
    Some((slope, mean_y - slope * mean_x))
}

/// Quartile summary of one sample, with 1.5×IQR outlier bounds.
#[derive(Debug, Clone, PartialEq)]
pub struct BoxStats {
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
}

impl BoxStats {
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.total_cmp(b));
        Some(Self {
            q1: quantile_linear(&sorted, 0.25)?,
            median: median(&sorted)?,
            q3: quantile_linear(&sorted, 0.75)?,
        })
    }

    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }

    /// Values below this are outliers.
    pub fn lower_bound(&self) -> f64 {
        self.q1 - 1.5 * self.iqr()
    }

    /// Values above this are outliers.
    pub fn upper_bound(&self) -> f64 {
        self.q3 + 1.5 * self.iqr()
    }

    /// True when `value` lies inside the closed interval between the bounds.
    pub fn within_bounds(&self, value: f64) -> bool {
        value >= self.lower_bound() && value <= self.upper_bound()
    }

    /// Whisker ends: the extreme values still inside the outlier bounds.
    pub fn whiskers(&self, sorted: &[f64]) -> (f64, f64) {
        let lower = sorted
            .iter()
            .copied()
            .find(|v| *v >= self.lower_bound())
            .unwrap_or(self.q1);
        let upper = sorted
            .iter()
            .rev()
            .copied()
            .find(|v| *v <= self.upper_bound())
            .unwrap_or(self.q3);
        (lower, upper)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pearson_detects_perfect_correlation() {
        let xs = [1.0, 2.0, 3.0, 4.0];
        let up = [2.0, 4.0, 6.0, 8.0];
        let down = [8.0, 6.0, 4.0, 2.0];
        assert!((pearson(&xs, &up).unwrap() - 1.0).abs() < 1e-12);
        assert!((pearson(&xs, &down).unwrap() + 1.0).abs() < 1e-12);
        assert_eq!(pearson(&xs, &[5.0, 5.0, 5.0, 5.0]), None);
    }

    #[test]
    fn linear_fit_recovers_a_line() {
        let xs = [0.0, 1.0, 2.0, 3.0];
        let ys = [1.0, 3.0, 5.0, 7.0];
        let (slope, intercept) = linear_fit(&xs, &ys).unwrap();
        assert!((slope - 2.0).abs() < 1e-12);
        assert!((intercept - 1.0).abs() < 1e-12);
    }

    #[test]
    fn outlier_bounds_are_inclusive() {
        // Q1=100, Q3=300 -> IQR=200, bounds [-200, 600]
        let stats = BoxStats {
            q1: 100.0,
            median: 200.0,
            q3: 300.0,
        };
        assert_eq!(stats.lower_bound(), -200.0);
        assert_eq!(stats.upper_bound(), 600.0);
        assert!(stats.within_bounds(-200.0));
        assert!(stats.within_bounds(600.0));
        assert!(!stats.within_bounds(600.1));
        assert!(!stats.within_bounds(-200.1));
    }

    #[test]
    fn whiskers_clamp_to_in_bound_extremes() {
        let sorted = [1.0, 2.0, 3.0, 4.0, 100.0];
        let stats = BoxStats::from_values(&sorted).unwrap();
        let (lo, hi) = stats.whiskers(&sorted);
        assert_eq!(lo, 1.0);
        assert!(hi < 100.0);
    }
}
