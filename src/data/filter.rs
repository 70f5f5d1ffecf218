use super::coerce::coerce_column;
use super::model::{NumericColumn, Table};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Row filter: drop rows missing any required numeric field
// ---------------------------------------------------------------------------

/// Return indices of rows where every column in `required` has a value.
///
/// All columns must be index-aligned. With no required columns there is no
/// row count to go by, so no indices are returned; use [`filter_rows`] to
/// keep a whole table.
pub fn present_indices(required: &[&NumericColumn]) -> Result<Vec<usize>> {
    let Some(first) = required.first() else {
        return Ok(Vec::new());
    };
    let n = first.len();
    if let Some(bad) = required.iter().find(|c| c.len() != n) {
        return Err(AnalysisError::LengthMismatch {
            left: n,
            right: bad.len(),
        });
    }

    Ok((0..n)
        .filter(|&i| required.iter().all(|col| col.is_present(i)))
        .collect())
}

/// Keep the rows of `table` whose `required` columns all coerce to a
/// number, preserving order.
pub fn filter_rows(table: &Table, required: &[&str]) -> Result<Table> {
    if required.is_empty() {
        return Ok(table.clone());
    }
    let columns = required
        .iter()
        .map(|name| coerce_column(table, name))
        .collect::<Result<Vec<_>>>()?;
    let refs: Vec<&NumericColumn> = columns.iter().collect();
    let keep = present_indices(&refs)?;

    log::debug!(
        "row filter on {required:?}: kept {} of {} rows",
        keep.len(),
        table.len()
    );
    Ok(table.select(&keep))
}
