use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{GroupKey, NumericColumn};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Aggregate – running count/sum of one value column within one group
// ---------------------------------------------------------------------------

/// Count and sum of the present values of one column in one group.
///
/// Only created on the first value, so `count >= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Aggregate {
    pub count: usize,
    pub sum: f64,
}

impl Aggregate {
    fn first(value: f64) -> Self {
        Self { count: 1, sum: value }
    }

    fn add(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// All aggregates for one key.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupSummary {
    /// Rows carrying this key.
    pub rows: usize,
    /// value column name → aggregate of its present values.
    pub columns: BTreeMap<String, Aggregate>,
}

impl GroupSummary {
    pub fn get(&self, column: &str) -> Option<&Aggregate> {
        self.columns.get(column)
    }
}

// ---------------------------------------------------------------------------
// GroupedAggregates – ordered key → summary mapping
// ---------------------------------------------------------------------------

/// Result of [`group_by`]; iterates in ascending key order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedAggregates {
    groups: BTreeMap<GroupKey, GroupSummary>,
}

impl GroupedAggregates {
    pub fn get(&self, key: f64) -> Option<&GroupSummary> {
        self.groups.get(&GroupKey(key))
    }

    pub fn iter(&self) -> impl Iterator<Item = (GroupKey, &GroupSummary)> {
        self.groups.iter().map(|(k, v)| (*k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = GroupKey> + '_ {
        self.groups.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sum of group row counts.
    pub fn total_rows(&self) -> usize {
        self.groups.values().map(|g| g.rows).sum()
    }

    /// Adjacent keys closer than `tolerance`.
    ///
    /// Such keys are kept apart by the aggregation; this only reports them.
    pub fn near_duplicate_keys(&self, tolerance: f64) -> Vec<(GroupKey, GroupKey)> {
        let keys: Vec<GroupKey> = self.keys().collect();
        keys.windows(2)
            .filter(|w| (w[1].value() - w[0].value()).abs() < tolerance)
            .map(|w| (w[0], w[1]))
            .collect()
    }
}

/// Tolerance used when warning about keys that differ only by float noise.
pub const NEAR_DUPLICATE_TOLERANCE: f64 = 1e-6;

/// Group rows by exact key value and aggregate each named value column.
///
/// Rows whose key is missing are skipped. Missing values inside a group are
/// excluded from that column's count and sum.
pub fn group_by(
    keys: &NumericColumn,
    values: &[(&str, &NumericColumn)],
) -> Result<GroupedAggregates> {
    if let Some((_, bad)) = values.iter().find(|(_, c)| c.len() != keys.len()) {
        return Err(AnalysisError::LengthMismatch {
            left: keys.len(),
            right: bad.len(),
        });
    }

    let mut groups: BTreeMap<GroupKey, GroupSummary> = BTreeMap::new();
    for (i, key) in keys.iter().enumerate() {
        let Some(key) = key else { continue };
        let group = groups.entry(GroupKey(key)).or_default();
        group.rows += 1;
        for (name, column) in values {
            if let Some(v) = column.get(i) {
                group
                    .columns
                    .entry(name.to_string())
                    .and_modify(|a| a.add(v))
                    .or_insert_with(|| Aggregate::first(v));
            }
        }
    }

    let grouped = GroupedAggregates { groups };
    for (a, b) in grouped.near_duplicate_keys(NEAR_DUPLICATE_TOLERANCE) {
        log::warn!(
            "group keys {} and {} differ only by float noise; kept separate",
            a.value(),
            b.value()
        );
    }
    Ok(grouped)
}
