//! Half-open interval binning for the grouped charts.
//!
//! Intervals follow the `(lower, upper]` convention: a value exactly on a
//! boundary falls into the lower-adjacent bin. Equal-width bins over an
//! observed range nudge the lowest edge down by 0.1% of the range so the
//! minimum lands in bin 0; fixed-width bins start at the floor of the
//! minimum and overshoot the maximum by one step, leaving a value equal to
//! the first edge outside all bins. Both conventions mirror the reference
//! binning semantics.

/// A sequence of `(lower, upper]` intervals defined by its edges.
#[derive(Debug, Clone, PartialEq)]
pub struct BinSpec {
    edges: Vec<f64>,
}

impl BinSpec {
    /// `count` equal-width bins spanning `[min, max]`.
    pub fn equal_width(min: f64, max: f64, count: usize) -> Option<Self> {
        if count == 0 || !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        let range = max - min;
        let mut edges = Vec::with_capacity(count + 1);
        if range == 0.0 {
            // degenerate range: one tiny interval around the single value
            edges.push(min - 0.001);
            edges.push(min + 0.001);
        } else {
            for i in 0..=count {
                edges.push(min + range * i as f64 / count as f64);
            }
            edges[0] = min - range * 0.001;
        }
        Some(Self { edges })
    }

    /// Fixed-width integer bins from `⌊min⌋`, overshooting past `max` by one step.
    pub fn fixed_width(min: f64, max: f64, width: i64) -> Option<Self> {
        if width <= 0 || !min.is_finite() || !max.is_finite() || min > max {
            return None;
        }
        let start = min.floor() as i64;
        let stop = max.floor() as i64 + width;
        let mut edges = Vec::new();
        let mut edge = start;
        while edge <= stop {
            edges.push(edge as f64);
            edge += width;
        }
        if edges.len() < 2 {
            edges.push((start + width) as f64);
        }
        Some(Self { edges })
    }

    /// Number of intervals.
    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Index of the interval containing `value`, under `(lower, upper]`.
    pub fn assign(&self, value: f64) -> Option<usize> {
        for i in 0..self.len() {
            if value > self.edges[i] && value <= self.edges[i + 1] {
                return Some(i);
            }
        }
        None
    }

    /// Midpoint of interval `i`.
    pub fn midpoint(&self, i: usize) -> f64 {
        (self.edges[i] + self.edges[i + 1]) / 2.0
    }

    /// Display label of interval `i`, e.g. `(5, 10]`.
    pub fn label(&self, i: usize) -> String {
        format!(
            "({}, {}]",
            lotscope_ingest::format_numeric(self.edges[i]),
            lotscope_ingest::format_numeric(self.edges[i + 1])
        )
    }

    /// Per-bin value lists for `(value, weight)`-style grouped aggregation.
    ///
    /// Returns one vector per bin holding the `payload` of the rows whose
    /// `value` falls in that bin; out-of-range rows are dropped.
    pub fn bucket(&self, values: &[f64], payload: &[f64]) -> Vec<Vec<f64>> {
        let mut buckets = vec![Vec::new(); self.len()];
        for (value, load) in values.iter().zip(payload) {
            if let Some(bin) = self.assign(*value) {
                buckets[bin].push(*load);
            }
        }
        buckets
    }

    /// Row count per bin.
    pub fn counts(&self, values: &[f64]) -> Vec<usize> {
        let mut counts = vec![0usize; self.len()];
        for value in values {
            if let Some(bin) = self.assign(*value) {
                counts[bin] += 1;
            }
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundary_values_fall_into_the_lower_bin() {
        let bins = BinSpec::fixed_width(0.0, 20.0, 5).unwrap();
        // edges 0, 5, 10, 15, 20, 25
        assert_eq!(bins.len(), 5);
        assert_eq!(bins.assign(5.0), Some(0));
        assert_eq!(bins.assign(5.1), Some(1));
        assert_eq!(bins.assign(20.0), Some(3));
    }

    #[test]
    fn fixed_width_overshoots_the_maximum() {
        let bins = BinSpec::fixed_width(1.0, 12.0, 10).unwrap();
        // edges 1, 11, 21: the max sits inside the overshoot bin
        assert_eq!(bins.len(), 2);
        assert_eq!(bins.assign(12.0), Some(1));
    }

    #[test]
    fn fixed_width_excludes_the_lowest_edge() {
        let bins = BinSpec::fixed_width(10.0, 30.0, 5).unwrap();
        assert_eq!(bins.assign(10.0), None);
        assert_eq!(bins.assign(10.5), Some(0));
    }

    #[test]
    fn equal_width_includes_the_minimum_via_the_lower_nudge() {
        let bins = BinSpec::equal_width(0.0, 100.0, 20).unwrap();
        assert_eq!(bins.len(), 20);
        assert_eq!(bins.assign(0.0), Some(0));
        assert_eq!(bins.assign(100.0), Some(19));
        assert_eq!(bins.assign(100.1), None);
        assert!((bins.midpoint(0) - 2.5).abs() < 0.2);
    }

    #[test]
    fn degenerate_range_yields_one_bin() {
        let bins = BinSpec::equal_width(7.0, 7.0, 20).unwrap();
        assert_eq!(bins.len(), 1);
        assert_eq!(bins.assign(7.0), Some(0));
    }

    #[test]
    fn bucket_and_counts_agree() {
        let bins = BinSpec::fixed_width(0.0, 10.0, 5).unwrap();
        let values = [1.0, 4.0, 6.0, 10.0];
        let prices = [100.0, 200.0, 300.0, 400.0];
        let buckets = bins.bucket(&values, &prices);
        assert_eq!(buckets[0], vec![100.0, 200.0]);
        assert_eq!(buckets[1], vec![300.0, 400.0]);
        assert_eq!(bins.counts(&values), vec![2, 2, 0]);
    }
}
