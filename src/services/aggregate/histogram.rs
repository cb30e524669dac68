//! Fixed-bin sentiment histogram.

use serde::Serialize;

/// Number of bins: centers -1.0, -0.9, ..., 0.9, 1.0.
pub const BIN_COUNT: usize = 21;

/// One histogram bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub center: f64,
    pub label: String,
    pub count: usize,
}

/// Counts of scores per 0.1-wide bin over [-1.0, 1.0].
///
/// Always has exactly `BIN_COUNT` bins, empty ones included.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    bins: Vec<HistogramBin>,
}

impl Histogram {
    /// All bins with zero counts.
    pub fn empty() -> Self {
        let bins = (0..BIN_COUNT)
            .map(|i| {
                let center = bin_center(i);
                HistogramBin {
                    center,
                    label: format!("{:.1}", center),
                    count: 0,
                }
            })
            .collect();
        Self { bins }
    }

    /// Count scores, ignoring missing values.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut histogram = Self::empty();
        for value in values.into_iter().flatten() {
            if let Some(i) = bin_index(value) {
                histogram.bins[i].count += 1;
            }
        }
        histogram
    }

    pub fn bins(&self) -> &[HistogramBin] {
        &self.bins
    }

    /// Number of counted values.
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest single bin count.
    pub fn max_count(&self) -> usize {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}

fn bin_center(i: usize) -> f64 {
    (i as f64 - 10.0) / 10.0
}

/// Nearest bin center after clamping into [-1.0, 1.0]; NaN has no bin.
fn bin_index(value: f64) -> Option<usize> {
    if value.is_nan() {
        return None;
    }
    let scaled = ((value.clamp(-1.0, 1.0) + 1.0) * 10.0).round();
    Some((scaled as usize).min(BIN_COUNT - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_has_21_labelled_bins() {
        let h = Histogram::empty();
        assert_eq!(h.bins().len(), 21);
        assert_eq!(h.bins()[0].label, "-1.0");
        assert_eq!(h.bins()[10].label, "0.0");
        assert_eq!(h.bins()[20].label, "1.0");
        assert_eq!(h.bins()[13].label, "0.3");
        assert_eq!(h.total(), 0);
    }

    #[test]
    fn exact_scores_land_in_their_bin() {
        let h = Histogram::from_values([Some(0.3), Some(-0.7), Some(1.0), Some(-1.0), Some(0.0)]);
        let count = |label: &str| h.bins().iter().find(|b| b.label == label).unwrap().count;
        assert_eq!(count("0.3"), 1);
        assert_eq!(count("-0.7"), 1);
        assert_eq!(count("1.0"), 1);
        assert_eq!(count("-1.0"), 1);
        assert_eq!(count("0.0"), 1);
    }

    #[test]
    fn off_grid_and_out_of_range_values_are_still_counted() {
        let values = [Some(0.84), Some(0.86), Some(1.7), Some(-3.0), None, Some(f64::NAN)];
        let h = Histogram::from_values(values);
        assert_eq!(h.total(), 4);
        assert_eq!(h.bins()[18].count, 1);
        assert_eq!(h.bins()[19].count, 1);
        assert_eq!(h.bins()[20].count, 1);
        assert_eq!(h.bins()[0].count, 1);
    }

    #[test]
    fn counts_sum_to_non_missing_values() {
        let values: Vec<Option<f64>> = (0..200)
            .map(|i| if i % 7 == 0 { None } else { Some((i as f64 * 0.37).sin()) })
            .collect();
        let expected = values.iter().filter(|v| v.is_some()).count();
        let h = Histogram::from_values(values);
        assert_eq!(h.bins().len(), BIN_COUNT);
        assert_eq!(h.total(), expected);
    }

    #[test]
    fn order_of_values_does_not_matter() {
        let values = vec![Some(0.5), Some(-0.2), Some(0.5), Some(0.9), None];
        let mut reversed = values.clone();
        reversed.reverse();
        assert_eq!(Histogram::from_values(values), Histogram::from_values(reversed));
    }
}
