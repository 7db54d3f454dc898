//! Fixed-width bracket classification.
//!
//! Distribution charts bucket mocks by overall score and percentile into
//! fixed-width brackets labelled "60-70" style. Classification is total:
//! every finite value lands in exactly one bracket, with out-of-range
//! values clamped into the nearest one.

/// A fixed set of bracket boundaries: `[lower, lower+width)`,
/// `[lower+width, lower+2*width)`, ..., final bracket closed on both ends.
#[derive(Debug, Clone, PartialEq)]
pub struct BracketScheme {
    lower: f64,
    upper: f64,
    width: f64,
}

impl BracketScheme {
    /// Create a scheme. Bounds are validated by config, so this only
    /// guards against a degenerate width.
    pub fn new(lower: f64, upper: f64, width: f64) -> Self {
        debug_assert!(width > 0.0 && upper > lower);
        Self {
            lower,
            upper,
            width,
        }
    }

    /// Overall-score scheme: width-10 brackets from 0 to `max` marks.
    pub fn score(max: f64) -> Self {
        Self::new(0.0, max, 10.0)
    }

    /// Percentile scheme: width-10 brackets from 0 to 100.
    pub fn percentile() -> Self {
        Self::new(0.0, 100.0, 10.0)
    }

    fn bracket_count(&self) -> usize {
        ((self.upper - self.lower) / self.width).ceil() as usize
    }

    fn label_for(&self, index: usize) -> String {
        let lo = self.lower + index as f64 * self.width;
        let hi = (lo + self.width).min(self.upper);
        format!("{}-{}", fmt_bound(lo), fmt_bound(hi))
    }

    /// All bracket labels, in ascending order.
    pub fn labels(&self) -> Vec<String> {
        (0..self.bracket_count()).map(|i| self.label_for(i)).collect()
    }

    /// Classify a value into its bracket label.
    ///
    /// Brackets are closed below and open above, except the last, which is
    /// closed on both ends. Out-of-range and non-finite values clamp to the
    /// nearest bracket, so classification never fails.
    pub fn classify(&self, value: f64) -> String {
        let v = if value.is_nan() {
            self.lower
        } else {
            value.clamp(self.lower, self.upper)
        };

        let count = self.bracket_count();
        let index = (((v - self.lower) / self.width).floor() as usize).min(count - 1);
        self.label_for(index)
    }
}

fn fmt_bound(v: f64) -> String {
    if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{v}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_basic() {
        let scheme = BracketScheme::score(200.0);
        assert_eq!(scheme.classify(67.5), "60-70");
        assert_eq!(scheme.classify(0.0), "0-10");
        assert_eq!(scheme.classify(142.5), "140-150");
    }

    #[test]
    fn test_lower_closed_upper_open() {
        let scheme = BracketScheme::score(200.0);
        assert_eq!(scheme.classify(60.0), "60-70");
        assert_eq!(scheme.classify(69.999), "60-70");
        assert_eq!(scheme.classify(70.0), "70-80");
    }

    #[test]
    fn test_final_bracket_closed_both_ends() {
        let scheme = BracketScheme::percentile();
        assert_eq!(scheme.classify(100.0), "90-100");
        assert_eq!(scheme.classify(99.9), "90-100");
        assert_eq!(scheme.classify(90.0), "90-100");
    }

    #[test]
    fn test_out_of_range_clamps() {
        let scheme = BracketScheme::score(200.0);
        assert_eq!(scheme.classify(-15.0), "0-10");
        assert_eq!(scheme.classify(250.0), "190-200");
        assert_eq!(scheme.classify(f64::NEG_INFINITY), "0-10");
        assert_eq!(scheme.classify(f64::INFINITY), "190-200");
        assert_eq!(scheme.classify(f64::NAN), "0-10");
    }

    #[test]
    fn test_labels_partition_without_gaps() {
        let scheme = BracketScheme::percentile();
        let labels = scheme.labels();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels.first().unwrap(), "0-10");
        assert_eq!(labels.last().unwrap(), "90-100");

        // Every finite value maps to a label from labels().
        for i in 0..=1000 {
            let v = i as f64 / 10.0;
            assert!(labels.contains(&scheme.classify(v)), "value {v}");
        }
    }

    #[test]
    fn test_classification_deterministic() {
        let scheme = BracketScheme::score(200.0);
        assert_eq!(scheme.classify(131.0), scheme.classify(131.0));
    }

    #[test]
    fn test_uneven_final_bracket() {
        // Upper bound not a multiple of the width: final bracket shrinks.
        let scheme = BracketScheme::new(0.0, 25.0, 10.0);
        assert_eq!(scheme.labels(), vec!["0-10", "10-20", "20-25"]);
        assert_eq!(scheme.classify(25.0), "20-25");
        assert_eq!(scheme.classify(19.9), "10-20");
    }
}
