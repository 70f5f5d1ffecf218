use std::path::Path;

use super::coerce::coerce_column;
use super::model::{DamageYear, FireIncident, NumericColumn, Record, Table};
use crate::error::{AnalysisError, Result};

// ---------------------------------------------------------------------------
// Column names of the CAL FIRE tables
// ---------------------------------------------------------------------------

pub const FRAP_YEAR: &str = "year_";
pub const FRAP_REPORT_ACRES: &str = "report_ac";
pub const FRAP_GIS_ACRES: &str = "gis_acres";
pub const FRAP_FIRE_NAME: &str = "fire_name";

pub const DAMAGE_YEAR: &str = "year";
pub const DAMAGE_STRUCTURES: &str = "structures";

// ---------------------------------------------------------------------------
// Generic CSV loader
// ---------------------------------------------------------------------------

/// Read a comma-separated file into a [`Table`].
///
/// The first line is the header. Every data row must have the same number
/// of fields as the header; empty fields are stored as missing.
pub fn load_table(path: &Path) -> Result<Table> {
    let file = std::fs::File::open(path).map_err(|source| AnalysisError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    read_table(file, path)
}

/// Parse CSV from any reader. `path` is only used in diagnostics.
pub fn read_table<R: std::io::Read>(input: R, path: &Path) -> Result<Table> {
    let format_err = |message: String| AnalysisError::Format {
        path: path.to_path_buf(),
        message,
    };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(input);

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| csv_error(e, path))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    if columns.iter().all(|c| c.is_empty()) {
        return Err(format_err("missing header line".to_string()));
    }

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| csv_error(e, path))?;
        let cells = record
            .iter()
            .map(|v| (!v.is_empty()).then(|| v.to_string()))
            .collect();
        rows.push(Record { cells });
    }

    log::info!(
        "Loaded {} rows with columns {:?} from {}",
        rows.len(),
        columns,
        path.display()
    );
    Table::new(columns, rows).map_err(|e| format_err(e.to_string()))
}

fn csv_error(err: csv::Error, path: &Path) -> AnalysisError {
    let line = err.position().map(|p| p.line());
    match err.into_kind() {
        csv::ErrorKind::Io(source) => AnalysisError::Io {
            path: path.to_path_buf(),
            source,
        },
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => AnalysisError::Format {
            path: path.to_path_buf(),
            message: format!(
                "line {}: expected {expected_len} fields but found {len}",
                line.map_or_else(|| "?".to_string(), |l| l.to_string())
            ),
        },
        other => AnalysisError::Format {
            path: path.to_path_buf(),
            message: format!("{other:?}"),
        },
    }
}

// ---------------------------------------------------------------------------
// Typed dataset loaders
// ---------------------------------------------------------------------------

/// Project a FRAP table onto [`FireIncident`] records.
///
/// `year_` and `gis_acres` are required columns. `report_ac` and
/// `fire_name` are optional: when absent every row reads as missing.
pub fn fire_incidents(table: &Table) -> Result<Vec<FireIncident>> {
    let year = coerce_column(table, FRAP_YEAR)?;
    let gis = coerce_column(table, FRAP_GIS_ACRES)?;
    let report = optional_numeric(table, FRAP_REPORT_ACRES)?;
    let names: Vec<Option<String>> = match table.column_index(FRAP_FIRE_NAME) {
        Ok(idx) => table
            .rows
            .iter()
            .map(|r| r.get(idx).map(String::from))
            .collect(),
        Err(_) => vec![None; table.len()],
    };

    Ok((0..table.len())
        .map(|i| FireIncident {
            year: year.get(i),
            report_acres: report.get(i),
            gis_acres: gis.get(i),
            fire_name: names[i].clone(),
        })
        .collect())
}

/// Project a damage table onto [`DamageYear`] records.
pub fn damage_years(table: &Table) -> Result<Vec<DamageYear>> {
    let year = coerce_column(table, DAMAGE_YEAR)?;
    let structures = coerce_column(table, DAMAGE_STRUCTURES)?;
    Ok((0..table.len())
        .map(|i| DamageYear {
            year: year.get(i),
            structures: structures.get(i),
        })
        .collect())
}

fn optional_numeric(table: &Table, column: &str) -> Result<NumericColumn> {
    match coerce_column(table, column) {
        Err(AnalysisError::MissingColumn(_)) => {
            log::warn!("column '{column}' not present, treating as missing");
            Ok(NumericColumn::new(vec![None; table.len()]))
        }
        other => other,
    }
}

/// Load and project the FRAP fire perimeter CSV.
pub fn load_fires(path: &Path) -> Result<Vec<FireIncident>> {
    let table = load_table(path)?;
    fire_incidents(&table).map_err(|e| with_path(e, path))
}

/// Load and project the yearly damage CSV.
pub fn load_damage(path: &Path) -> Result<Vec<DamageYear>> {
    let table = load_table(path)?;
    damage_years(&table).map_err(|e| with_path(e, path))
}

fn with_path(err: AnalysisError, path: &Path) -> AnalysisError {
    match err {
        AnalysisError::MissingColumn(col) => AnalysisError::Format {
            path: path.to_path_buf(),
            message: format!("missing required column '{col}'"),
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Table> {
        read_table(text.as_bytes(), Path::new("inline.csv"))
    }

    #[test]
    fn test_read_table_keeps_order_and_empties() {
        let t = parse("year,structures\n2017,10\n2016,\n").unwrap();
        assert_eq!(t.columns, vec!["year", "structures"]);
        assert_eq!(t.len(), 2);
        assert_eq!(t.rows[0].get(0), Some("2017"));
        assert_eq!(t.rows[1].get(1), None);
    }

    #[test]
    fn test_header_fields_kept_verbatim() {
        let t = parse("year , structures\n2017,10\n").unwrap();
        assert_eq!(t.columns, vec!["year ", " structures"]);
        assert!(t.column_index("year").is_err());
    }

    #[test]
    fn test_ragged_row_is_format_error() {
        let err = parse("a,b\n1,2\n3\n").unwrap_err();
        assert!(matches!(err, AnalysisError::Format { .. }), "{err}");
    }

    #[test]
    fn test_empty_input_is_format_error() {
        assert!(matches!(parse(""), Err(AnalysisError::Format { .. })));
    }

    #[test]
    fn test_header_only_is_empty_table() {
        let t = parse("a,b\n").unwrap();
        assert!(t.is_empty());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_table(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, AnalysisError::Io { .. }));
        assert!(err.to_string().contains("/definitely/not/here.csv"));
    }

    #[test]
    fn test_fire_incidents_projection() {
        let t = parse(
            "year_,fire_name,report_ac,gis_acres\n\
             2017,CREEK,100,\n\
             unknown, ,,50\n",
        )
        .unwrap();
        let fires = fire_incidents(&t).unwrap();
        assert_eq!(fires[0].year, Some(2017.0));
        assert_eq!(fires[0].fire_name.as_deref(), Some("CREEK"));
        assert_eq!(fires[0].report_acres, Some(100.0));
        assert_eq!(fires[0].gis_acres, None);
        assert_eq!(fires[1].year, None);
        // whitespace is still a name, as far as counting fires goes
        assert_eq!(fires[1].fire_name.as_deref(), Some(" "));
        assert_eq!(fires[1].gis_acres, Some(50.0));
    }

    #[test]
    fn test_fire_incidents_without_optional_columns() {
        let t = parse("year_,gis_acres\n2018,3\n").unwrap();
        let fires = fire_incidents(&t).unwrap();
        assert_eq!(fires[0].report_acres, None);
        assert_eq!(fires[0].fire_name, None);
    }

    #[test]
    fn test_damage_requires_structures() {
        let t = parse("year\n2018\n").unwrap();
        assert!(matches!(
            damage_years(&t),
            Err(AnalysisError::MissingColumn(c)) if c == "structures"
        ));
    }
}
