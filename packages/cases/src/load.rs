//! Loaders for the case table and the population reference table.
//!
//! Both tables arrive as already-downloaded bytes; fetching them is the
//! caller's concern.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use chrono::NaiveDate;
use covid_map_cases_models::{CaseRecord, PopulationRecord};
use serde::Deserialize;

use crate::CasesError;

/// Raw row of the case CSV (`date,county,state,fips,cases,deaths`).
///
/// Counts can be blank in the published data; blanks read as zero.
#[derive(Debug, Deserialize)]
struct CaseRow {
    date: NaiveDate,
    county: String,
    state: String,
    fips: Option<String>,
    #[serde(deserialize_with = "csv::invalid_option")]
    cases: Option<u64>,
    #[serde(deserialize_with = "csv::invalid_option")]
    deaths: Option<u64>,
}

impl From<CaseRow> for CaseRecord {
    fn from(row: CaseRow) -> Self {
        Self {
            date: row.date,
            county: row.county,
            state: row.state,
            fips: row.fips.filter(|f| !f.is_empty()),
            cases: row.cases.unwrap_or(0),
            deaths: row.deaths.unwrap_or(0),
        }
    }
}

/// Deserializes every row of a CSV, skipping rows whose fields do not
/// parse. Read failures still abort.
fn deserialize_rows<T, R>(reader: R, table: &str) -> Result<Vec<T>, CasesError>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

    let mut rows = Vec::new();
    let mut skipped = 0_usize;
    for row in reader.deserialize::<T>() {
        match row {
            Ok(row) => rows.push(row),
            Err(e) if matches!(e.kind(), csv::ErrorKind::Deserialize { .. }) => {
                skipped += 1;
                log::debug!("Skipping unparseable {table} row: {e}");
            }
            Err(e) => return Err(e.into()),
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {skipped} unparseable {table} rows");
    }

    Ok(rows)
}

/// Reads the case CSV.
///
/// Rows that fail to parse (e.g. an unparseable date) are skipped and
/// logged.
///
/// # Errors
///
/// Returns [`CasesError::Csv`] if the CSV itself cannot be read.
pub fn read_cases<R: Read>(reader: R) -> Result<Vec<CaseRecord>, CasesError> {
    let records: Vec<CaseRecord> = deserialize_rows::<CaseRow, _>(reader, "case")?
        .into_iter()
        .map(CaseRecord::from)
        .collect();

    log::info!("Parsed {} case records", records.len());
    Ok(records)
}

/// Reads the population reference table from a JSON array.
///
/// Extra fields (state FIPS, alternate population columns) are ignored.
///
/// # Errors
///
/// Returns [`CasesError::Json`] if the document is not an array of
/// population rows.
pub fn read_population_json<R: Read>(reader: R) -> Result<Vec<PopulationRecord>, CasesError> {
    let records: Vec<PopulationRecord> = serde_json::from_reader(reader)?;
    log::info!("Parsed {} population records", records.len());
    Ok(records)
}

/// Reads the population reference table from CSV with columns
/// `region,subregion,fips,population` (`us_county_fips` is accepted for
/// `fips`).
///
/// Rows that fail to parse are skipped and logged.
///
/// # Errors
///
/// Returns [`CasesError::Csv`] if the CSV itself cannot be read.
pub fn read_population_csv<R: Read>(reader: R) -> Result<Vec<PopulationRecord>, CasesError> {
    let records: Vec<PopulationRecord> = deserialize_rows(reader, "population")?;

    log::info!("Parsed {} population records", records.len());
    Ok(records)
}

/// Opens and reads the case CSV at `path`.
///
/// # Errors
///
/// Returns [`CasesError::Io`] if the file cannot be opened, otherwise as
/// [`read_cases`].
pub fn load_cases(path: &Path) -> Result<Vec<CaseRecord>, CasesError> {
    log::info!("Reading cases from {}", path.display());
    read_cases(BufReader::new(File::open(path)?))
}

/// Opens and reads the population table at `path`, as JSON when the
/// extension is `.json` and as CSV otherwise.
///
/// # Errors
///
/// Returns [`CasesError::Io`] if the file cannot be opened, otherwise as
/// [`read_population_json`] / [`read_population_csv`].
pub fn load_population(path: &Path) -> Result<Vec<PopulationRecord>, CasesError> {
    log::info!("Reading population from {}", path.display());
    let reader = BufReader::new(File::open(path)?);

    if path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
    {
        read_population_json(reader)
    } else {
        read_population_csv(reader)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_case_csv() {
        let csv = "date,county,state,fips,cases,deaths\n\
                   2020-03-01,New York City,New York,,1,0\n\
                   2020-03-02,Westchester,New York,36119,10,\n";
        let records = read_cases(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].county, "New York City");
        assert_eq!(records[0].fips, None);
        assert_eq!(records[1].fips.as_deref(), Some("36119"));
        assert_eq!(records[1].cases, 10);
        assert_eq!(records[1].deaths, 0);
        assert_eq!(
            records[1].date,
            NaiveDate::from_ymd_opt(2020, 3, 2).unwrap()
        );
    }

    #[test]
    fn skips_rows_with_bad_dates() {
        let csv = "date,county,state,fips,cases,deaths\n\
                   2020-03-01,Albany,New York,36001,1,0\n\
                   bogus,Erie,New York,36029,2,0\n\
                   2020-03-02,Albany,New York,36001,3,0\n";
        let records = read_cases(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.county == "Albany"));
        assert_eq!(records[1].cases, 3);
    }

    #[test]
    fn skips_population_rows_with_bad_counts() {
        let csv = "region,subregion,fips,population\n\
                   New York,Albany,36001,305506\n\
                   New York,Erie,36029,lots\n";
        let records = read_population_csv(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].subregion, "Albany");
    }

    #[test]
    fn reads_population_json_with_source_names() {
        let json = r#"[
            { "region": "New York", "subregion": "Albany", "us_county_fips": "36001",
              "population": 305506, "us_state_fips": "36", "nyt_population": 305506 },
            { "region": "New York", "subregion": "Nowhere", "us_county_fips": null,
              "population": null }
        ]"#;
        let records = read_population_json(json.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].fips.as_deref(), Some("36001"));
        assert_eq!(records[0].population, Some(305_506));
        assert_eq!(records[1].population, None);
    }

    #[test]
    fn missing_file_is_io_error() {
        let result = load_cases(Path::new("/nonexistent/us-counties.csv"));
        assert!(matches!(result, Err(CasesError::Io(_))));
    }

    #[test]
    fn reads_population_csv() {
        let csv = "region,subregion,fips,population\n\
                   New York,Albany,36001,305506\n";
        let records = read_population_csv(csv.as_bytes()).unwrap();
        assert_eq!(records[0].join_key(), "New York_Albany");
        assert_eq!(records[0].population, Some(305_506));
    }
}
