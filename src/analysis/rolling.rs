use serde::Serialize;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// TimeSeries
// ---------------------------------------------------------------------------

/// One observation of a yearly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub period: f64,
    pub value: f64,
}

/// Observations sorted ascending by period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TimeSeries {
    points: Vec<Point>,
}

impl TimeSeries {
    /// Build a series from unordered `(period, value)` pairs.
    ///
    /// The sort is stable, so rows sharing a period keep their input order.
    /// Shared periods are logged, not merged.
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (f64, f64)>,
    {
        let mut points: Vec<Point> = pairs
            .into_iter()
            .map(|(period, value)| Point { period, value })
            .collect();
        points.sort_by(|a, b| a.period.total_cmp(&b.period));

        let series = Self { points };
        for period in series.duplicate_periods() {
            log::warn!("period {period} appears more than once in time series");
        }
        series
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn periods(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.period).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Periods that occur more than once (each reported once).
    pub fn duplicate_periods(&self) -> Vec<f64> {
        let mut dups: Vec<f64> = self
            .points
            .windows(2)
            .filter(|w| w[0].period == w[1].period)
            .map(|w| w[0].period)
            .collect();
        dups.dedup();
        dups
    }

    /// Point with the largest value; the earliest one on ties.
    pub fn peak(&self) -> Option<Point> {
        self.points.iter().copied().fold(None, |best, p| match best {
            Some(b) if b.value >= p.value => Some(b),
            _ => Some(p),
        })
    }

    /// Points whose period is at least `from`.
    pub fn since(&self, from: f64) -> TimeSeries {
        TimeSeries {
            points: self.points.iter().copied().filter(|p| p.period >= from).collect(),
        }
    }

    // -----------------------------------------------------------------------
    // Rolling mean
    // -----------------------------------------------------------------------

    /// Trailing mean over positions `i + 1 - window ..= i`.
    ///
    /// The window shrinks at the start of the series. Entry `i` is `None`
    /// while fewer than `min_periods` observations are available.
    pub fn rolling_mean(&self, window: usize, min_periods: usize) -> Result<Vec<Option<f64>>> {
        if window == 0 {
            return Err(AnalysisError::InvalidInput("rolling window must be at least 1".into()));
        }
        if min_periods == 0 || min_periods > window {
            return Err(AnalysisError::InvalidInput(format!(
                "min_periods must be in 1..={window}, got {min_periods}"
            )));
        }

        // Summed per window, not as a running total.
        Ok((0..self.points.len())
            .map(|i| {
                let lo = (i + 1).saturating_sub(window);
                let slice = &self.points[lo..=i];
                (slice.len() >= min_periods)
                    .then(|| slice.iter().map(|p| p.value).sum::<f64>() / slice.len() as f64)
            })
            .collect())
    }

    /// Rolling mean with a minimum of one period, as a new series.
    pub fn smooth(&self, window: usize) -> Result<TimeSeries> {
        let means = self.rolling_mean(window, 1)?;
        Ok(TimeSeries {
            points: self
                .points
                .iter()
                .zip(means)
                .map(|(p, m)| Point {
                    period: p.period,
                    value: m.unwrap_or(p.value),
                })
                .collect(),
        })
    }
}
