#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case table loading, population join, and derived metrics.
//!
//! The pipeline runs in three stages, each taking its input by value or
//! by shared reference and returning a freshly built table:
//!
//! 1. [`pipeline::build`] left-joins cases onto population and derives
//!    percentages, log counts, and the year-week bucket.
//! 2. [`filter`] narrows the table (one state, no "Unknown" county).
//! 3. [`rate::annotate`] adds per-county day-over-day rates.
//!
//! [`process`] runs all three in that order. Per-record numeric
//! degeneracies (missing population, division by zero, `ln(0)`) are
//! resolved locally and never surface as errors.

pub mod filter;
pub mod load;
pub mod pipeline;
pub mod rate;

use covid_map_cases_models::{CaseRecord, EnrichedRecord, PopulationRecord};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading case and population tables.
#[derive(Debug, Error)]
pub enum CasesError {
    /// CSV parsing failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON parsing failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// An I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which rows survive between the join and rate computation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineOptions {
    /// Keep only this state, if set.
    #[serde(default)]
    pub state: Option<String>,
    /// Drop rows whose county is "Unknown".
    #[serde(default = "default_drop_unknown")]
    pub drop_unknown: bool,
}

const fn default_drop_unknown() -> bool {
    true
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            state: None,
            drop_unknown: default_drop_unknown(),
        }
    }
}

/// Runs join, filters, and rate computation in order.
#[must_use]
pub fn process(
    cases: &[CaseRecord],
    population: &[PopulationRecord],
    options: &PipelineOptions,
) -> Vec<EnrichedRecord> {
    let mut records = pipeline::build(cases, population);
    log::info!("Enriched {} case records", records.len());

    if let Some(state) = &options.state {
        records = filter::in_state(records, state);
        log::info!("{} records remain for {state}", records.len());
    }

    if options.drop_unknown {
        records = filter::without_unknown(records);
    }

    rate::annotate(records)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn case(day: u32, county: &str, state: &str, cases: u64, deaths: u64) -> CaseRecord {
        CaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 4, day).unwrap(),
            county: county.to_string(),
            state: state.to_string(),
            fips: None,
            cases,
            deaths,
        }
    }

    fn population(county: &str, fips: &str, population: u64) -> PopulationRecord {
        PopulationRecord {
            region: "New York".to_string(),
            subregion: county.to_string(),
            fips: Some(fips.to_string()),
            population: Some(population),
        }
    }

    #[test]
    fn two_counties_three_days_end_to_end() {
        let cases = [
            case(1, "Albany", "New York", 10, 0),
            case(1, "Erie", "New York", 100, 1),
            case(2, "Albany", "New York", 20, 1),
            case(2, "Erie", "New York", 100, 2),
            case(3, "Albany", "New York", 30, 1),
            case(3, "Erie", "New York", 50, 4),
        ];
        let pop = [
            population("Albany", "36001", 1000),
            population("Erie", "36029", 10_000),
        ];

        let records = process(&cases, &pop, &PipelineOptions::default());

        assert_eq!(records.len(), 6);
        assert!(records.windows(2).all(|w| w[0].date <= w[1].date));
        for r in &records {
            assert!(!r.year_week.to_string().is_empty());
            assert!(r.cases_rate.is_some() && r.deaths_rate.is_some());
        }

        let rates = |county: &str| -> Vec<f64> {
            records
                .iter()
                .filter(|r| r.county == county)
                .map(|r| r.cases_rate.unwrap())
                .collect()
        };
        let albany = rates("Albany");
        let erie = rates("Erie");
        assert!((albany[1] - 1.0).abs() < 1e-12 && (albany[2] - 0.5).abs() < 1e-12);
        assert!(erie[1].abs() < 1e-12 && (erie[2] + 0.5).abs() < 1e-12);
        assert!(albany[0] == 0.0 && erie[0] == 0.0);
    }

    #[test]
    fn filters_run_before_rates() {
        // The Florida row would sit between the two Nassau, New York rows
        // if it were not removed before rates are taken.
        let cases = [
            case(1, "Nassau", "New York", 10, 0),
            case(2, "Nassau", "Florida", 1000, 0),
            case(3, "Nassau", "New York", 20, 0),
            case(3, "Unknown", "New York", 5, 0),
        ];
        let options = PipelineOptions {
            state: Some("New York".to_string()),
            drop_unknown: true,
        };

        let records = process(&cases, &[], &options);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].cases_rate, Some(1.0));
    }

    #[test]
    fn unmatched_population_does_not_abort() {
        let cases = [
            case(1, "Albany", "New York", 10, 0),
            case(1, "Nowhere", "New York", 3, 0),
        ];
        let pop = [population("Albany", "36001", 100)];
        let records = process(&cases, &pop, &PipelineOptions::default());

        assert_eq!(records.len(), 2);
        let nowhere = records.iter().find(|r| r.county == "Nowhere").unwrap();
        assert_eq!(nowhere.population, None);
        assert_eq!(nowhere.pct_cases_of_population, None);
    }

    #[test]
    fn options_default_when_fields_missing() {
        let options: PipelineOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, PipelineOptions::default());
        assert!(options.drop_unknown);
    }
}
