/// Data layer: core types, loading, coercion, merging and filtering.
///
/// Architecture:
/// ```text
///   calfire_frap.csv / calfire_damage.csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table (text cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  coerce   │  column → NumericColumn (unparseable → missing)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  merge    │  preferred column, backfilled from a fallback column
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop rows missing required fields
///   └──────────┘
/// ```

pub mod coerce;
pub mod filter;
pub mod loader;
pub mod merge;
pub mod model;
