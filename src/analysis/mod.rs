/// Analysis layer: aggregation, smoothing and distribution statistics over
/// coerced columns.
///
/// ```text
///   NumericColumn(s)
///        │
///        ├──► group      key → {count, sum, mean}, ascending keys
///        │       │
///        │       ▼
///        │   rolling     TimeSeries → trailing mean
///        │
///        └──► summary    mean / median / std / z / skew / kurtosis
///                │
///                ▼
///            histogram   equal-width bins
/// ```

pub mod group;
pub mod histogram;
pub mod rolling;
pub mod summary;
