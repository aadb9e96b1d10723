//! Headline statistics over a dataset's download column.

use super::DatasetRow;

/// Statistics shown in the terminal header bar.
///
/// Unavailable measurements are counted separately and left out of the
/// min/max/mean.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Summary {
    /// Total rows.
    pub count: usize,
    /// Rows recording an unavailable measurement.
    pub unavailable: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub mean: Option<f64>,
    /// Speed of the last row in file order (may be the sentinel).
    pub latest: Option<f64>,
}

impl Summary {
    /// Compute statistics over `rows`.
    pub fn from_rows(rows: &[DatasetRow]) -> Self {
        let measured: Vec<f64> = rows
            .iter()
            .filter(|r| !r.is_unavailable())
            .map(|r| r.speed)
            .collect();

        let (min, max, mean) = if measured.is_empty() {
            (None, None, None)
        } else {
            let min = measured.iter().copied().fold(f64::INFINITY, f64::min);
            let max = measured.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            let mean = measured.iter().sum::<f64>() / measured.len() as f64;
            (Some(min), Some(max), Some(mean))
        };

        Self {
            count: rows.len(),
            unavailable: rows.len() - measured.len(),
            min,
            max,
            mean,
            latest: rows.last().map(|r| r.speed),
        }
    }
}
