//! Wildfire trend analysis over the CAL FIRE FRAP perimeter table and the
//! yearly structures-damaged table.
//!
//! - [`data`]: CSV loading, numeric coercion, fallback merging, row filtering
//! - [`analysis`]: group-by aggregation, rolling means, summary statistics
//! - [`report`]: the per-dataset analyses and their exports

pub mod analysis;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use config::{AnalysisConfig, load_config};
pub use error::{AnalysisError, Result};
