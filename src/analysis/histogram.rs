use serde::Serialize;

use crate::error::{AnalysisError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

/// Equal-width bins spanning the sample range.
///
/// Bins are half-open `[lower, upper)` except the last, which includes the
/// maximum. A constant sample gets the range `value ± 0.5`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    pub fn new(sample: &[f64], bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(AnalysisError::InvalidInput("histogram needs at least one bin".into()));
        }
        let finite: Vec<f64> = sample.iter().copied().filter(|x| x.is_finite()).collect();
        if finite.is_empty() {
            return Err(AnalysisError::InvalidInput("histogram of an empty sample".into()));
        }

        let mut lo = finite.iter().copied().fold(f64::INFINITY, f64::min);
        let mut hi = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }
        let width = (hi - lo) / bins as f64;

        let mut counts = vec![0usize; bins];
        for x in finite {
            let idx = (((x - lo) / width) as usize).min(bins - 1);
            counts[idx] += 1;
        }

        Ok(Self {
            bins: counts
                .into_iter()
                .enumerate()
                .map(|(i, count)| Bin {
                    lower: lo + width * i as f64,
                    upper: if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 },
                    count,
                })
                .collect(),
        })
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}
