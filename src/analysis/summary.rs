//! Summary statistics for a numeric sample
//!
//! - Mean, median, population standard deviation
//! - Z-scores
//! - Skewness and excess kurtosis (biased moment estimators)
//!
//! Non-finite entries are omitted from the sample before anything is
//! computed, never treated as zero.

use serde::Serialize;

use crate::data::model::NumericColumn;
use crate::error::{AnalysisError, Result};

/// Summary statistics of a non-empty sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryStatistics {
    /// Number of values used
    pub count: usize,
    /// Number of NaN/infinite entries omitted
    pub omitted: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    /// Middle value; average of the two middle values for even counts
    pub median: f64,
    /// Population variance (divides by N)
    pub variance: f64,
    /// Population standard deviation (divides by N, not N - 1)
    pub std_dev: f64,
    #[serde(skip)]
    m3: f64,
    #[serde(skip)]
    m4: f64,
}

impl SummaryStatistics {
    /// Compute statistics, omitting non-finite entries.
    ///
    /// Fails with `InvalidInput` when no finite value remains.
    pub fn from_sample(data: &[f64]) -> Result<Self> {
        let mut sorted: Vec<f64> = data.iter().copied().filter(|x| x.is_finite()).collect();
        let omitted = data.len() - sorted.len();
        if sorted.is_empty() {
            return Err(AnalysisError::InvalidInput(
                "summary statistics need at least one value".into(),
            ));
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let n = count as f64;
        let min = sorted[0];
        let max = sorted[count - 1];
        let mean = if min == max {
            min
        } else {
            sorted.iter().sum::<f64>() / n
        };

        let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
        if min != max {
            for x in &sorted {
                let d = x - mean;
                let d2 = d * d;
                m2 += d2;
                m3 += d2 * d;
                m4 += d2 * d2;
            }
            m2 /= n;
            m3 /= n;
            m4 /= n;
        }

        let median = if count % 2 == 0 {
            (sorted[count / 2 - 1] + sorted[count / 2]) / 2.0
        } else {
            sorted[count / 2]
        };

        Ok(Self {
            count,
            omitted,
            min,
            max,
            mean,
            median,
            variance: m2,
            std_dev: m2.sqrt(),
            m3,
            m4,
        })
    }

    /// Statistics over the present values of a coerced column.
    pub fn from_column(column: &NumericColumn) -> Result<Self> {
        Self::from_sample(&column.present())
    }

    fn require_spread(&self, what: &'static str) -> Result<()> {
        if self.variance == 0.0 {
            return Err(AnalysisError::DivisionByZero(what));
        }
        Ok(())
    }

    /// `(x - mean) / std_dev`.
    pub fn zscore(&self, x: f64) -> Result<f64> {
        self.require_spread("z-score")?;
        Ok((x - self.mean) / self.std_dev)
    }

    /// Z-scores of every element of `data`, in order.
    pub fn zscores(&self, data: &[f64]) -> Result<Vec<f64>> {
        self.require_spread("z-score")?;
        Ok(data.iter().map(|x| (x - self.mean) / self.std_dev).collect())
    }

    /// Fisher-Pearson coefficient of skewness `m3 / m2^1.5`, without the
    /// small-sample bias correction.
    pub fn skewness(&self) -> Result<f64> {
        self.require_spread("skewness")?;
        Ok(self.m3 / self.variance.powf(1.5))
    }

    /// Excess kurtosis `m4 / m2^2 - 3` (normal distribution → 0), without
    /// the small-sample bias correction.
    pub fn kurtosis(&self) -> Result<f64> {
        self.require_spread("kurtosis")?;
        Ok(self.m4 / (self.variance * self.variance) - 3.0)
    }
}

/// Z-scores of a whole sample against its own mean and std dev.
pub fn zscore_batch(data: &[f64]) -> Result<Vec<f64>> {
    SummaryStatistics::from_sample(data)?.zscores(data)
}
