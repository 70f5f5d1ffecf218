//! The four wildfire analyses, each as a pure pipeline over typed records
//! plus a runner that loads inputs and exports the result table.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::analysis::group::group_by;
use crate::analysis::histogram::Histogram;
use crate::analysis::rolling::TimeSeries;
use crate::analysis::summary::SummaryStatistics;
use crate::config::AnalysisConfig;
use crate::data::filter::present_indices;
use crate::data::loader::{load_damage, load_fires};
use crate::data::model::{DamageYear, FireIncident, GroupKey, NumericColumn};
use crate::error::{AnalysisError, Result as AnalysisResult};

// ---------------------------------------------------------------------------
// Acres burned by year
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearlyAcres {
    pub year: f64,
    pub acres: f64,
    pub rolling_mean: f64,
}

/// Total acres per year, reported acreage backfilled with GIS acreage,
/// with a trailing rolling mean.
pub fn acres_by_year(fires: &[FireIncident], window: usize) -> AnalysisResult<Vec<YearlyAcres>> {
    let year: NumericColumn = fires.iter().map(|f| f.year).collect();
    let report: NumericColumn = fires.iter().map(|f| f.report_acres).collect();
    let gis: NumericColumn = fires.iter().map(|f| f.gis_acres).collect();

    let acres = report.fill_missing_from(&gis)?;
    let keep = present_indices(&[&year, &acres])?;
    log::debug!("acres by year: {} of {} rows usable", keep.len(), fires.len());

    let grouped = group_by(&year.select(&keep), &[("acres", &acres.select(&keep))])?;
    let series = TimeSeries::from_pairs(grouped.iter().filter_map(|(key, g)| {
        g.get("acres").map(|a| (key.value(), a.sum))
    }));
    let smoothed = series.smooth(window)?;

    Ok(series
        .points()
        .iter()
        .zip(smoothed.points())
        .map(|(p, s)| YearlyAcres {
            year: p.period,
            acres: p.value,
            rolling_mean: s.value,
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Structures damaged by year
// ---------------------------------------------------------------------------

/// Damage rows as a year-sorted series; rows missing either field are dropped.
pub fn damage_trend(damage: &[DamageYear]) -> TimeSeries {
    let series = TimeSeries::from_pairs(
        damage
            .iter()
            .filter_map(|d| Some((d.year?, d.structures?))),
    );
    if series.len() < damage.len() {
        log::debug!("damage trend: dropped {} incomplete rows", damage.len() - series.len());
    }
    series
}

// ---------------------------------------------------------------------------
// Fire size distribution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FireSizeReport {
    pub stats: SummaryStatistics,
    /// Z-scores of the first values of the sample, in file order.
    /// The standardized fields are `None` for a zero-variance sample.
    pub zscores: Option<Vec<f64>>,
    pub skewness: Option<f64>,
    pub kurtosis: Option<f64>,
    /// `mean ± std_dev`
    pub band: (f64, f64),
    pub histogram: Histogram,
    /// Fires below the small-fire threshold; `None` when there are none.
    pub small_fires: Option<Histogram>,
}

/// Distribution of GIS acreage over all fires that have one.
pub fn fire_size_report(fires: &[FireIncident], cfg: &AnalysisConfig) -> AnalysisResult<FireSizeReport> {
    let sizes: Vec<f64> = fires.iter().filter_map(|f| f.gis_acres).collect();
    let stats = SummaryStatistics::from_sample(&sizes)?;

    let preview = &sizes[..sizes.len().min(cfg.zscore_preview)];
    let zscores = standardized(stats.zscores(preview))?;
    let skewness = standardized(stats.skewness())?;
    let kurtosis = standardized(stats.kurtosis())?;

    let small: Vec<f64> = sizes
        .iter()
        .copied()
        .filter(|&s| s < cfg.small_fire_threshold)
        .collect();
    let small_fires = if small.is_empty() {
        None
    } else {
        Some(Histogram::new(&small, cfg.inset_bins)?)
    };

    Ok(FireSizeReport {
        band: (stats.mean - stats.std_dev, stats.mean + stats.std_dev),
        histogram: Histogram::new(&sizes, cfg.histogram_bins)?,
        stats,
        zscores,
        skewness,
        kurtosis,
        small_fires,
    })
}

/// Zero variance leaves standardized values undefined without failing the report.
fn standardized<T>(result: AnalysisResult<T>) -> AnalysisResult<Option<T>> {
    match result {
        Ok(v) => Ok(Some(v)),
        Err(AnalysisError::DivisionByZero(what)) => {
            log::warn!("fire sizes have zero variance; {what} left undefined");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

// ---------------------------------------------------------------------------
// Yearly summary table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub year: f64,
    /// Rows with a fire name.
    pub fires: usize,
    pub total_acres: f64,
    pub avg_acres: f64,
    /// From the damage table; empty when that year has no damage row.
    pub structures: Option<f64>,
}

/// Per-year fire count and GIS acreage, joined with structures damaged,
/// restricted to the most recent `recent_years` years.
pub fn fire_summary_table(
    fires: &[FireIncident],
    damage: &[DamageYear],
    recent_years: u32,
) -> AnalysisResult<Vec<SummaryRow>> {
    if recent_years == 0 {
        return Err(AnalysisError::InvalidInput("recent_years must be at least 1".into()));
    }

    let year: NumericColumn = fires.iter().map(|f| f.year).collect();
    let gis: NumericColumn = fires.iter().map(|f| f.gis_acres).collect();
    let named: NumericColumn = fires
        .iter()
        .map(|f| f.fire_name.as_ref().map(|_| 1.0))
        .collect();

    let keep = present_indices(&[&year, &gis])?;
    let grouped = group_by(
        &year.select(&keep),
        &[("acres", &gis.select(&keep)), ("named", &named.select(&keep))],
    )?;

    let mut structures: BTreeMap<GroupKey, f64> = BTreeMap::new();
    for d in damage {
        let Some(y) = d.year else { continue };
        let Some(s) = d.structures else { continue };
        if structures.insert(GroupKey(y), s).is_some() {
            log::warn!("damage table lists year {} more than once; using the last row", GroupKey(y));
        }
    }

    let Some(max_year) = grouped.keys().last() else {
        return Ok(Vec::new());
    };
    let cutoff = max_year.value().trunc() - f64::from(recent_years - 1);

    Ok(grouped
        .iter()
        .filter(|(key, _)| key.value() >= cutoff)
        .filter_map(|(key, g)| {
            let acres = g.get("acres")?;
            Some(SummaryRow {
                year: key.value(),
                fires: g.get("named").map_or(0, |a| a.count),
                total_acres: acres.sum,
                avg_acres: acres.mean(),
                structures: structures.get(&key).copied(),
            })
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

/// Write serializable rows as CSV with a header line.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    serde_json::to_writer_pretty(file, value)
        .with_context(|| format!("writing {}", path.display()))?;
    Ok(())
}

fn output_path(cfg: &AnalysisConfig, file_name: &str) -> Result<PathBuf> {
    fs::create_dir_all(&cfg.output_dir)
        .with_context(|| format!("creating output directory {}", cfg.output_dir.display()))?;
    Ok(cfg.output_dir.join(file_name))
}

// ---------------------------------------------------------------------------
// Runners
// ---------------------------------------------------------------------------

/// One named analysis: load inputs, compute, export. Returns the file written.
#[derive(Clone, Copy)]
pub struct Analysis {
    pub name: &'static str,
    pub run: fn(&AnalysisConfig) -> Result<PathBuf>,
}

/// All analyses in the order the driver runs them.
pub const ANALYSES: [Analysis; 4] = [
    Analysis { name: "damage trend", run: run_damage_trend },
    Analysis { name: "acres by year", run: run_acres_by_year },
    Analysis { name: "fire size distribution", run: run_fire_size },
    Analysis { name: "fire summary table", run: run_summary_table },
];

pub fn run_damage_trend(cfg: &AnalysisConfig) -> Result<PathBuf> {
    let damage = load_damage(&cfg.damage_path)?;
    let series = damage_trend(&damage);
    if let Some(peak) = series.peak() {
        log::info!("Peak damage: {} structures in {}", peak.value, GroupKey(peak.period));
    }
    let out = output_path(cfg, "damage_trend.csv")?;
    write_csv(&out, series.points())?;
    Ok(out)
}

pub fn run_acres_by_year(cfg: &AnalysisConfig) -> Result<PathBuf> {
    let fires = load_fires(&cfg.frap_path)?;
    let rows = acres_by_year(&fires, cfg.rolling_window).context("aggregating acres by year")?;
    let out = output_path(cfg, "acres_by_year.csv")?;
    write_csv(&out, &rows)?;
    Ok(out)
}

pub fn run_fire_size(cfg: &AnalysisConfig) -> Result<PathBuf> {
    let fires = load_fires(&cfg.frap_path)?;
    let report = fire_size_report(&fires, cfg).context("fire size statistics")?;
    log::info!(
        "Mean acres: {:.2}, median acres: {:.2}, std dev acres: {:.2}",
        report.stats.mean,
        report.stats.median,
        report.stats.std_dev
    );
    if let (Some(skew), Some(kurt)) = (report.skewness, report.kurtosis) {
        log::info!("Skewness: {skew:.2}, kurtosis: {kurt:.2}");
    }
    let out = output_path(cfg, "fire_size_summary.json")?;
    write_json(&out, &report)?;
    Ok(out)
}

pub fn run_summary_table(cfg: &AnalysisConfig) -> Result<PathBuf> {
    let fires = load_fires(&cfg.frap_path)?;
    let damage = load_damage(&cfg.damage_path)?;
    let rows = fire_summary_table(&fires, &damage, cfg.recent_years)
        .context("building fire summary table")?;
    let out = output_path(cfg, "fire_summary_table.csv")?;
    write_csv(&out, &rows)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fire(year: Option<f64>, report: Option<f64>, gis: Option<f64>, name: Option<&str>) -> FireIncident {
        FireIncident {
            year,
            report_acres: report,
            gis_acres: gis,
            fire_name: name.map(String::from),
        }
    }

    #[test]
    fn test_acres_by_year_fallback_and_drop() {
        let fires = vec![
            fire(Some(2017.0), Some(100.0), None, None),
            fire(Some(2017.0), None, Some(50.0), None),
            fire(Some(2018.0), None, None, None),
        ];
        let rows = acres_by_year(&fires, 5).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].year, 2017.0);
        assert_eq!(rows[0].acres, 150.0);
        assert_eq!(rows[0].rolling_mean, 150.0);
    }

    #[test]
    fn test_damage_trend_sorted_with_peak() {
        let damage = vec![
            DamageYear { year: Some(2018.0), structures: Some(22_000.0) },
            DamageYear { year: Some(2017.0), structures: Some(10_000.0) },
            DamageYear { year: None, structures: Some(5.0) },
        ];
        let series = damage_trend(&damage);
        assert_eq!(series.periods(), vec![2017.0, 2018.0]);
        assert_eq!(series.peak().unwrap().period, 2018.0);
    }

    #[test]
    fn test_summary_table_counts_named_fires_and_joins() {
        let fires = vec![
            fire(Some(2016.0), None, Some(10.0), Some("A")),
            fire(Some(2017.0), None, Some(30.0), Some("B")),
            fire(Some(2017.0), None, Some(10.0), None),
            fire(Some(2017.0), None, None, Some("no acres")),
        ];
        let damage = vec![DamageYear { year: Some(2017.0), structures: Some(9.0) }];
        let rows = fire_summary_table(&fires, &damage, 10).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].structures, None);
        let r = &rows[1];
        assert_eq!(r.fires, 1);
        assert_eq!(r.total_acres, 40.0);
        assert_eq!(r.avg_acres, 20.0);
        assert_eq!(r.structures, Some(9.0));
    }

    #[test]
    fn test_summary_table_recent_window() {
        let fires: Vec<FireIncident> = (2000..2020)
            .map(|y| fire(Some(y as f64), None, Some(1.0), Some("x")))
            .collect();
        let rows = fire_summary_table(&fires, &[], 10).unwrap();
        assert_eq!(rows.len(), 10);
        assert_eq!(rows[0].year, 2010.0);
        assert_eq!(rows[9].year, 2019.0);
        assert!(fire_summary_table(&fires, &[], 0).is_err());
    }

    #[test]
    fn test_fire_size_report() {
        let fires: Vec<FireIncident> = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0, 5000.0]
            .iter()
            .map(|&a| fire(Some(2000.0), None, Some(a), None))
            .collect();
        let cfg = AnalysisConfig {
            zscore_preview: 3,
            ..AnalysisConfig::default()
        };
        let report = fire_size_report(&fires, &cfg).unwrap();
        assert_eq!(report.zscores.as_ref().unwrap().len(), 3);
        assert_eq!(report.histogram.total(), 9);
        assert_eq!(report.small_fires.as_ref().unwrap().total(), 8);
        assert!(report.skewness.unwrap() > 0.0);
    }

    #[test]
    fn test_fire_size_report_single_fire() {
        let fires = vec![fire(Some(2000.0), None, Some(120.0), Some("LONE"))];
        let report = fire_size_report(&fires, &AnalysisConfig::default()).unwrap();
        assert_eq!(report.stats.mean, 120.0);
        assert_eq!(report.stats.median, 120.0);
        assert_eq!(report.stats.std_dev, 0.0);
        assert_eq!(report.band, (120.0, 120.0));
        assert_eq!(report.histogram.total(), 1);
        assert_eq!(report.small_fires.as_ref().unwrap().total(), 1);
        assert!(report.zscores.is_none());
        assert!(report.skewness.is_none());
        assert!(report.kurtosis.is_none());
    }

    #[test]
    fn test_fire_size_report_needs_sizes() {
        let fires = vec![fire(Some(2000.0), Some(3.0), None, None)];
        let err = fire_size_report(&fires, &AnalysisConfig::default()).unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidInput(_)));
    }
}
