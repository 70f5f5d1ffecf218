use std::fs;
use std::path::{Path, PathBuf};

use wildfire_trends::analysis::group::group_by;
use wildfire_trends::data::coerce::coerce_column;
use wildfire_trends::data::filter::{filter_rows, present_indices};
use wildfire_trends::data::loader::{load_fires, load_table};
use wildfire_trends::report::{self, ANALYSES};
use wildfire_trends::{AnalysisConfig, AnalysisError};

const FRAP: &str = "\
year_,fire_name,report_ac,gis_acres
2017,CREEK,100,
2017,TUBBS,,50
2018,,,
unknown,MYSTERY,40,40
2016,OAK,5,6
";

const DAMAGE: &str = "\
year,structures
2016,120
2017,10000
";

fn write(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn config(dir: &Path) -> AnalysisConfig {
    AnalysisConfig {
        frap_path: write(dir, "frap.csv", FRAP),
        damage_path: write(dir, "damage.csv", DAMAGE),
        output_dir: dir.join("results"),
        ..AnalysisConfig::default()
    }
}

#[test]
fn fallback_merge_filter_and_group_from_csv() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let table = load_table(&cfg.frap_path).unwrap();

    let year = coerce_column(&table, "year_").unwrap();
    let report = coerce_column(&table, "report_ac").unwrap();
    let gis = coerce_column(&table, "gis_acres").unwrap();
    let acres = report.fill_missing_from(&gis).unwrap();

    let keep = present_indices(&[&year, &acres]).unwrap();
    assert_eq!(keep, vec![0, 1, 4]);

    let grouped = group_by(&year.select(&keep), &[("acres", &acres.select(&keep))]).unwrap();
    let y2017 = grouped.get(2017.0).unwrap().get("acres").unwrap();
    assert_eq!(y2017.count, 2);
    assert_eq!(y2017.sum, 150.0);
    assert_eq!(y2017.mean(), 75.0);

    // "unknown" year never becomes a key; 2018 has no acreage at all.
    assert_eq!(grouped.len(), 2);
    assert!(grouped.get(2018.0).is_none());
    assert_eq!(grouped.total_rows(), keep.len());
}

#[test]
fn row_filter_on_table_drops_text_years() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());
    let table = load_table(&cfg.frap_path).unwrap();
    let kept = filter_rows(&table, &["year_", "gis_acres"]).unwrap();
    assert_eq!(kept.len(), 2);
    assert_eq!(kept.columns, table.columns);
}

#[test]
fn missing_required_column_names_the_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write(dir.path(), "bad.csv", "year_,fire_name\n2017,CREEK\n");
    let err = load_fires(&path).unwrap_err();
    assert!(matches!(err, AnalysisError::Format { .. }));
    let msg = err.to_string();
    assert!(msg.contains("bad.csv"), "{msg}");
    assert!(msg.contains("gis_acres"), "{msg}");
}

#[test]
fn driver_analyses_write_their_exports() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config(dir.path());

    for analysis in ANALYSES {
        let out = (analysis.run)(&cfg).unwrap_or_else(|e| panic!("{}: {e:#}", analysis.name));
        assert!(out.exists(), "{} wrote nothing", analysis.name);
    }

    let acres = fs::read_to_string(cfg.output_dir.join("acres_by_year.csv")).unwrap();
    let mut lines = acres.lines();
    assert_eq!(lines.next(), Some("year,acres,rolling_mean"));
    assert_eq!(lines.next(), Some("2016.0,5.0,5.0"));
    assert_eq!(lines.next(), Some("2017.0,150.0,77.5"));

    let summary = fs::read_to_string(cfg.output_dir.join("fire_summary_table.csv")).unwrap();
    assert!(summary.starts_with("year,fires,total_acres,avg_acres,structures"));
    assert!(summary.contains("2017.0,1,50.0,50.0,10000.0"), "{summary}");

    let json = fs::read_to_string(cfg.output_dir.join("fire_size_summary.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["stats"]["count"], 3);
}

#[test]
fn failed_load_does_not_stop_other_analyses() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = AnalysisConfig {
        damage_path: dir.path().join("missing.csv"),
        ..config(dir.path())
    };

    let results: Vec<_> = ANALYSES.iter().map(|a| (a.run)(&cfg)).collect();
    let err = results[0].as_ref().unwrap_err();
    assert!(format!("{err:#}").contains("missing.csv"));
    assert!(results[1].is_ok());
    assert!(results[2].is_ok());
    assert!(results[3].is_err());

    assert!(report::run_acres_by_year(&cfg).is_ok());
}
