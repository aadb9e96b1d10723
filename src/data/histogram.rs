//! Equal-width histogram of download speeds.

/// Default number of bins.
pub const DEFAULT_BINS: usize = 30;

/// Smallest and largest bin counts the UI allows.
pub const MIN_BINS: usize = 1;
pub const MAX_BINS: usize = 100;

/// One histogram bin covering `[lower, upper)` (the last bin is closed).
#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: u64,
}

/// Counts of values falling into equal-width bins spanning their range.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Histogram {
    bins: Vec<Bin>,
}

impl Histogram {
    /// Bin `values` into `bins` equal-width buckets between their minimum
    /// and maximum. Non-finite values are ignored. When every value is the
    /// same, the range is widened by 0.5 on each side.
    pub fn from_values<I>(values: I, bins: usize) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = bins.clamp(MIN_BINS, MAX_BINS);
        let mut min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let mut max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if min == max {
            min -= 0.5;
            max += 0.5;
        }
        let width = (max - min) / n as f64;

        let mut result: Vec<Bin> = (0..n)
            .map(|i| Bin {
                lower: min + width * i as f64,
                upper: if i + 1 == n { max } else { min + width * (i + 1) as f64 },
                count: 0,
            })
            .collect();

        for v in values {
            let idx = (((v - min) / width) as usize).min(n - 1);
            result[idx].count += 1;
        }

        Self { bins: result }
    }

    /// The bins, lowest first.
    pub fn bins(&self) -> &[Bin] {
        &self.bins
    }

    /// Number of values counted.
    pub fn total(&self) -> u64 {
        self.bins.iter().map(|b| b.count).sum()
    }

    /// Largest single bin count.
    pub fn max_count(&self) -> u64 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }
}
