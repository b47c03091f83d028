//! Descriptive statistics shared by the queries and reports.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample standard deviation (ddof = 1); `None` below two values.
pub fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let variance =
        values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// Quantile with linear interpolation over a sorted slice.
///
/// Uses the `(n - 1) * q` index convention, interpolating between the two
/// bracketing order statistics. This matches the reference statistics
/// libraries' default method.
pub fn quantile_linear(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() || !(0.0..=1.0).contains(&q) {
        return None;
    }
    let pos = (sorted.len() - 1) as f64 * q;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let weight = pos - lo as f64;
    Some(sorted[lo] + weight * (sorted[hi] - sorted[lo]))
}

/// Median via [`quantile_linear`] at 0.5.
pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile_linear(sorted, 0.5)
}

/// Descriptive summary in the shape of a dataframe `describe()` call.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub count: usize,
    pub mean: f64,
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Full descriptive summary; `None` for an empty slice.
pub fn describe(values: &[f64]) -> Option<Describe> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let first = *sorted.first()?;
    let last = *sorted.last()?;
    Some(Describe {
        count: sorted.len(),
        mean: mean(&sorted)?,
        std: sample_std(&sorted),
        min: first,
        q25: quantile_linear(&sorted, 0.25)?,
        median: median(&sorted)?,
        q75: quantile_linear(&sorted, 0.75)?,
        max: last,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantile_matches_reference_interpolation() {
        // numpy.percentile([1, 2, 3, 4, 5], 80) == 4.2
        let sorted = [1.0, 2.0, 3.0, 4.0, 5.0];
        let q80 = quantile_linear(&sorted, 0.80).unwrap();
        assert!((q80 - 4.2).abs() < 1e-12);

        // numpy.percentile(range(1, 101), 80) == 80.2
        let long: Vec<f64> = (1..=100).map(f64::from).collect();
        let q80 = quantile_linear(&long, 0.80).unwrap();
        assert!((q80 - 80.2).abs() < 1e-9);
    }

    #[test]
    fn quantile_handles_degenerate_inputs() {
        assert_eq!(quantile_linear(&[], 0.5), None);
        assert_eq!(quantile_linear(&[7.0], 0.8), Some(7.0));
        assert_eq!(quantile_linear(&[1.0, 2.0], 1.5), None);
    }

    #[test]
    fn describe_matches_known_vector() {
        let d = describe(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(d.count, 4);
        assert!((d.mean - 2.5).abs() < 1e-12);
        assert!((d.q25 - 1.75).abs() < 1e-12);
        assert!((d.median - 2.5).abs() < 1e-12);
        assert!((d.q75 - 3.25).abs() < 1e-12);
        assert_eq!(d.min, 1.0);
        assert_eq!(d.max, 4.0);
    }

    #[test]
    fn std_is_sample_not_population() {
        let std = sample_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        // population std of this vector is 2.0; sample std is larger
        assert!((std - 2.138089935299395).abs() < 1e-12);
        assert_eq!(sample_std(&[1.0]), None);
    }
}
