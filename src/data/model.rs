use std::fmt;

use serde::Serialize;

use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Record / Table – raw text rows as read from disk
// ---------------------------------------------------------------------------

/// One row of raw input. Cells stay untyped text until coerced; an empty
/// field is stored as `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub cells: Vec<Option<String>>,
}

impl Record {
    pub fn get(&self, idx: usize) -> Option<&str> {
        self.cells.get(idx).and_then(|c| c.as_deref())
    }
}

/// Ordered rows sharing one column schema.
///
/// Every record has exactly `columns.len()` cells; the loader rejects
/// anything else.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Header fields in file order.
    pub columns: Vec<String>,
    /// Data rows in file order.
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>, rows: Vec<Record>) -> Result<Self> {
        if let Some((i, bad)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.cells.len() != columns.len())
        {
            return Err(AnalysisError::InvalidInput(format!(
                "row {i} has {} cells but the schema has {} columns",
                bad.cells.len(),
                columns.len()
            )));
        }
        Ok(Self { columns, rows })
    }

    /// Position of a column in the schema.
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AnalysisError::MissingColumn(name.to_string()))
    }

    /// Text cells of one column, index-aligned with `rows`.
    pub fn column(&self, name: &str) -> Result<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Ok(self.rows.iter().map(|r| r.get(idx)).collect())
    }

    /// Keep only the rows at `indices`, in the given order.
    pub fn select(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices
                .iter()
                .filter_map(|&i| self.rows.get(i).cloned())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// NumericColumn – a coerced column
// ---------------------------------------------------------------------------

/// A column after numeric coercion: one optional value per table row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NumericColumn {
    values: Vec<Option<f64>>,
}

impl NumericColumn {
    pub fn new(values: Vec<Option<f64>>) -> Self {
        Self { values }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<f64> {
        self.values.get(idx).copied().flatten()
    }

    pub fn is_present(&self, idx: usize) -> bool {
        self.get(idx).is_some()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<f64>> + '_ {
        self.values.iter().copied()
    }

    /// Present values only, in row order.
    pub fn present(&self) -> Vec<f64> {
        self.values.iter().flatten().copied().collect()
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }

    /// Keep only the entries at `indices`.
    pub fn select(&self, indices: &[usize]) -> NumericColumn {
        indices
            .iter()
            .filter_map(|&i| self.values.get(i).copied())
            .collect()
    }
}

impl FromIterator<Option<f64>> for NumericColumn {
    fn from_iter<I: IntoIterator<Item = Option<f64>>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// GroupKey – a float grouping value usable as an ordered map key
// ---------------------------------------------------------------------------

/// Grouping key compared bit-for-bit, ordered with `f64::total_cmp`.
///
/// `2017.0` and `2017.0000001` are distinct keys.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(transparent)]
pub struct GroupKey(pub f64);

impl GroupKey {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for GroupKey {}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl std::hash::Hash for GroupKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.is_finite() {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

// ---------------------------------------------------------------------------
// Typed dataset records
// ---------------------------------------------------------------------------

/// One FRAP fire perimeter row after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct FireIncident {
    /// `year_`
    pub year: Option<f64>,
    /// `report_ac` – acreage as reported by the agency.
    pub report_acres: Option<f64>,
    /// `gis_acres` – acreage computed from the GIS perimeter.
    pub gis_acres: Option<f64>,
    /// `fire_name`
    pub fire_name: Option<String>,
}

/// One row of the yearly structures-damaged table.
#[derive(Debug, Clone, PartialEq)]
pub struct DamageYear {
    pub year: Option<f64>,
    pub structures: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Record {
        Record {
            cells: cells
                .iter()
                .map(|c| (!c.is_empty()).then(|| c.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_table_rejects_ragged_rows() {
        let cols = vec!["a".to_string(), "b".to_string()];
        let err = Table::new(cols, vec![row(&["1", "2"]), row(&["3"])]).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }

    #[test]
    fn test_column_lookup() {
        let cols = vec!["a".to_string(), "b".to_string()];
        let table = Table::new(cols, vec![row(&["1", ""]), row(&["3", "x"])]).unwrap();
        assert_eq!(table.column("b").unwrap(), vec![None, Some("x")]);
        assert!(matches!(
            table.column("c"),
            Err(AnalysisError::MissingColumn(name)) if name == "c"
        ));
    }

    #[test]
    fn test_select_preserves_order() {
        let cols = vec!["a".to_string()];
        let table = Table::new(cols, vec![row(&["1"]), row(&["2"]), row(&["3"])]).unwrap();
        let picked = table.select(&[0, 2]);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked.rows[1].get(0), Some("3"));
    }

    #[test]
    fn test_group_key_is_bit_exact() {
        assert_eq!(GroupKey(2017.0), GroupKey(2017.0));
        assert_ne!(GroupKey(2017.0), GroupKey(2017.000_000_1));
        assert!(GroupKey(2016.0) < GroupKey(2017.0));
        assert_eq!(GroupKey(2017.0).to_string(), "2017");
        assert_eq!(GroupKey(2017.5).to_string(), "2017.5");
    }

    #[test]
    fn test_numeric_column_present_and_select() {
        let col = NumericColumn::new(vec![Some(1.0), None, Some(3.0)]);
        assert_eq!(col.present(), vec![1.0, 3.0]);
        assert_eq!(col.missing_count(), 1);
        assert_eq!(col.select(&[1, 2]).values(), &[None, Some(3.0)]);
    }
}
