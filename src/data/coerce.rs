use super::model::{NumericColumn, Table};
use crate::error::Result;

// ---------------------------------------------------------------------------
// Numeric coercion
// ---------------------------------------------------------------------------

/// Permissive conversion of a cell to a number.
///
/// Anything that does not parse to a finite `f64` is missing.
pub trait ToNumeric {
    fn to_numeric(&self) -> Option<f64>;
}

impl ToNumeric for str {
    fn to_numeric(&self) -> Option<f64> {
        let s = self.trim();
        if s.is_empty() {
            return None;
        }
        s.parse::<f64>().ok().filter(|v| v.is_finite())
    }
}

impl ToNumeric for String {
    fn to_numeric(&self) -> Option<f64> {
        self.as_str().to_numeric()
    }
}

impl ToNumeric for f64 {
    fn to_numeric(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl<T: ToNumeric + ?Sized> ToNumeric for &T {
    fn to_numeric(&self) -> Option<f64> {
        (**self).to_numeric()
    }
}

impl<T: ToNumeric> ToNumeric for Option<T> {
    fn to_numeric(&self) -> Option<f64> {
        self.as_ref().and_then(|v| v.to_numeric())
    }
}

/// Coerce any sequence of cells into a [`NumericColumn`].
pub fn coerce_values<I>(cells: I) -> NumericColumn
where
    I: IntoIterator,
    I::Item: ToNumeric,
{
    cells.into_iter().map(|c| c.to_numeric()).collect()
}

/// Coerce one column of `table`.
///
/// Fails only when `column` is not in the schema; unparseable cells become
/// missing.
pub fn coerce_column(table: &Table, column: &str) -> Result<NumericColumn> {
    let cells = table.column(column)?;
    let coerced = coerce_values(cells);
    log::debug!(
        "coerced '{column}': {} of {} values missing",
        coerced.missing_count(),
        coerced.len()
    );
    Ok(coerced)
}

impl NumericColumn {
    /// Re-coercing a numeric column is the identity for finite values.
    pub fn coerce(&self) -> NumericColumn {
        coerce_values(self.iter())
    }
}
