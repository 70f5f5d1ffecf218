use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Input paths, output location and analysis parameters.
///
/// Every field has a default, so a config file only needs the keys it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// FRAP fire perimeter table (`year_`, `fire_name`, `report_ac`, `gis_acres`).
    pub frap_path: PathBuf,
    /// Structures damaged per year (`year`, `structures`).
    pub damage_path: PathBuf,
    /// Directory receiving exported tables.
    pub output_dir: PathBuf,
    /// Trailing window of the acres-by-year rolling mean.
    pub rolling_window: usize,
    /// Number of most recent years in the summary table.
    pub recent_years: u32,
    /// Upper bound of the small-fire histogram.
    pub small_fire_threshold: f64,
    pub histogram_bins: usize,
    pub inset_bins: usize,
    /// How many leading z-scores to report.
    pub zscore_preview: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            frap_path: PathBuf::from("2018-07-wildfire-trends/data/calfire_frap.csv"),
            damage_path: PathBuf::from("2018-07-wildfire-trends/data/calfire_damage.csv"),
            output_dir: PathBuf::from("results"),
            rolling_window: 5,
            recent_years: 10,
            small_fire_threshold: 2000.0,
            histogram_bins: 40,
            inset_bins: 30,
            zscore_preview: 10,
        }
    }
}

/// Read an [`AnalysisConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<AnalysisConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    let config: AnalysisConfig = serde_json::from_str(&content)
        .with_context(|| format!("parsing config {}", path.display()))?;
    Ok(config)
}
