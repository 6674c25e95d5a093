#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Case, population, and enriched record types.
//!
//! A [`CaseRecord`] is one cumulative (county, date) observation from the
//! case table. Joined with a [`PopulationRecord`] and run through the
//! metric pipeline it becomes an [`EnrichedRecord`], which is what the map
//! and chart layers consume.

use std::fmt;

use chrono::{Datelike as _, NaiveDate};
use serde::{Deserialize, Serialize};

/// One cumulative case/death observation for a county on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub date: NaiveDate,
    pub county: String,
    pub state: String,
    /// Zero-padded county FIPS code, absent for rows like "Unknown".
    pub fips: Option<String>,
    pub cases: u64,
    pub deaths: u64,
}

impl CaseRecord {
    /// Join key into the population table (`"{state}_{county}"`).
    ///
    /// Exact and case-sensitive: a county spelled differently in the two
    /// tables silently fails to join.
    #[must_use]
    pub fn join_key(&self) -> String {
        join_key(&self.state, &self.county)
    }
}

/// A static population reference row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopulationRecord {
    /// State name.
    pub region: String,
    /// County name.
    pub subregion: String,
    /// Zero-padded county FIPS code.
    #[serde(alias = "us_county_fips")]
    pub fips: Option<String>,
    #[serde(default)]
    pub population: Option<u64>,
}

impl PopulationRecord {
    /// Join key matching [`CaseRecord::join_key`].
    #[must_use]
    pub fn join_key(&self) -> String {
        join_key(&self.region, &self.subregion)
    }
}

/// Builds the composite `"{state}_{county}"` join key.
#[must_use]
pub fn join_key(state: &str, county: &str) -> String {
    format!("{state}_{county}")
}

/// Calendar bucket of year plus Sunday-start week number.
///
/// Weeks follow strftime `%U`: week 1 begins on the first Sunday of the
/// year and any days before it fall in week 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct YearWeek {
    pub year: i32,
    pub week: u32,
}

impl YearWeek {
    /// Buckets a date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        let ordinal0 = date.ordinal0();
        let weekday = date.weekday().num_days_from_sunday();
        Self {
            year: date.year(),
            week: (ordinal0 + 7 - weekday) / 7,
        }
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.week)
    }
}

impl From<YearWeek> for String {
    fn from(value: YearWeek) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for YearWeek {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        let (year, week) = value
            .split_once('-')
            .ok_or_else(|| format!("invalid year-week '{value}'"))?;
        Ok(Self {
            year: year
                .parse()
                .map_err(|e| format!("invalid year in '{value}': {e}"))?,
            week: week
                .parse()
                .map_err(|e| format!("invalid week in '{value}': {e}"))?,
        })
    }
}

/// A case record joined with population and annotated with metrics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedRecord {
    pub date: NaiveDate,
    pub county: String,
    pub state: String,
    /// Join key against the boundary feature `id`. Taken from the
    /// population table, falling back to the case table's own code when
    /// the join missed.
    pub fips: Option<String>,
    pub cases: u64,
    pub deaths: u64,
    /// `None` when no population row matched.
    pub population: Option<u64>,
    #[serde(rename = "% cases of population")]
    pub pct_cases_of_population: Option<f64>,
    #[serde(rename = "% deaths of population")]
    pub pct_deaths_of_population: Option<f64>,
    #[serde(rename = "% deaths of cases")]
    pub pct_deaths_of_cases: Option<f64>,
    pub cases_log: f64,
    pub deaths_log: f64,
    /// Day-over-day fractional change in cases; `None` until rates are
    /// computed.
    pub cases_rate: Option<f64>,
    /// Day-over-day fractional change in deaths; `None` until rates are
    /// computed.
    pub deaths_rate: Option<f64>,
    #[serde(rename = "Year-Week")]
    pub year_week: YearWeek,
}
