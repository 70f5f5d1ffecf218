use super::model::NumericColumn;
use crate::error::{AnalysisError, Result};

/// First present value, in preference order.
pub fn coalesce<T>(preferred: Option<T>, fallback: Option<T>) -> Option<T> {
    preferred.or(fallback)
}

impl NumericColumn {
    /// Positional fallback merge: `self[i]` where present, else `other[i]`.
    ///
    /// Used to backfill reported acreage from GIS-computed acreage.
    pub fn fill_missing_from(&self, other: &NumericColumn) -> Result<NumericColumn> {
        if self.len() != other.len() {
            return Err(AnalysisError::LengthMismatch {
                left: self.len(),
                right: other.len(),
            });
        }
        Ok(self
            .iter()
            .zip(other.iter())
            .map(|(a, b)| coalesce(a, b))
            .collect())
    }
}
