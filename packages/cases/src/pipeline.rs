//! Joins the case table onto population and derives per-record metrics.

use std::collections::BTreeMap;

use covid_map_cases_models::{CaseRecord, EnrichedRecord, PopulationRecord, YearWeek};

/// Left-joins `cases` onto `population` and derives the metric columns.
///
/// Records whose `(state, county)` matches no population row are kept
/// with a missing population and missing population-based percentages.
/// When several population rows share a key, the first one wins.
///
/// The result is stably sorted by date, so records for the same day keep
/// their input order. Rate columns are left empty for
/// [`crate::rate::annotate`].
#[must_use]
pub fn build(cases: &[CaseRecord], population: &[PopulationRecord]) -> Vec<EnrichedRecord> {
    let lookup = index_population(population);

    let mut misses = 0_usize;
    let mut records: Vec<EnrichedRecord> = cases
        .iter()
        .map(|case| {
            let matched = lookup.get(case.join_key().as_str()).copied();
            if matched.is_none() {
                misses += 1;
                log::trace!("No population row for '{}'", case.join_key());
            }
            enrich(case, matched)
        })
        .collect();

    if misses > 0 {
        log::warn!(
            "{misses} of {} case records matched no population row",
            cases.len()
        );
    }

    records.sort_by_key(|r| r.date);
    records
}

fn index_population(population: &[PopulationRecord]) -> BTreeMap<String, &PopulationRecord> {
    let mut lookup = BTreeMap::new();
    let mut duplicates = 0_usize;

    for row in population {
        let key = row.join_key();
        if lookup.contains_key(&key) {
            duplicates += 1;
            log::debug!("Duplicate population row for '{key}', keeping the first");
        } else {
            lookup.insert(key, row);
        }
    }

    if duplicates > 0 {
        log::warn!("Ignored {duplicates} duplicate population rows");
    }

    lookup
}

fn enrich(case: &CaseRecord, population: Option<&PopulationRecord>) -> EnrichedRecord {
    let pop = population.and_then(|p| p.population);
    let fips = population
        .and_then(|p| p.fips.clone())
        .or_else(|| case.fips.clone());

    EnrichedRecord {
        date: case.date,
        county: case.county.clone(),
        state: case.state.clone(),
        fips,
        cases: case.cases,
        deaths: case.deaths,
        population: pop,
        pct_cases_of_population: percent(case.cases, pop),
        pct_deaths_of_population: percent(case.deaths, pop),
        pct_deaths_of_cases: percent(case.deaths, Some(case.cases)),
        cases_log: log_or_zero(case.cases),
        deaths_log: log_or_zero(case.deaths),
        cases_rate: None,
        deaths_rate: None,
        year_week: YearWeek::from_date(case.date),
    }
}

/// `100 * numerator / denominator`, or `None` when the denominator is
/// missing or zero.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percent(numerator: u64, denominator: Option<u64>) -> Option<f64> {
    match denominator {
        Some(d) if d > 0 => Some(100.0 * numerator as f64 / d as f64),
        _ => None,
    }
}

/// Natural log of a count, with `ln(0) = -inf` stored as `0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn log_or_zero(count: u64) -> f64 {
    let value = (count as f64).ln();
    if value.is_infinite() { 0.0 } else { value }
}
