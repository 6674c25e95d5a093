//! Per-county day-over-day rate of change.
//!
//! Rates are fractional (`0.5` means +50%). The first day of each county
//! has no prior value and gets `0`. A change from a zero count is also
//! stored as `0` instead of an infinite or NaN rate, which hides the jump
//! to the first nonzero count.

use covid_map_cases_models::EnrichedRecord;

/// Fills `cases_rate` and `deaths_rate` for every record.
///
/// Records are partitioned by county and each partition is ordered by date
/// (ties keep input order) before rates are taken, so one county's values
/// never affect another's. The output has the same records, stably sorted
/// by date; an input already in date order comes back in the same order.
///
/// Callers should filter to a single state first: counties are keyed by
/// name alone.
#[must_use]
pub fn annotate(mut records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
    let keys: Vec<_> = records
        .iter()
        .map(|r| (r.county.as_str(), r.date))
        .collect();

    let mut order: Vec<usize> = (0..records.len()).collect();
    order.sort_by_key(|&i| keys[i]);

    let mut rates = vec![(0.0, 0.0); records.len()];
    let mut counties = 0_usize;
    for partition in order.chunk_by(|&a, &b| keys[a].0 == keys[b].0) {
        counties += 1;
        let cases: Vec<u64> = partition.iter().map(|&i| records[i].cases).collect();
        let deaths: Vec<u64> = partition.iter().map(|&i| records[i].deaths).collect();

        for ((&i, c), d) in partition
            .iter()
            .zip(rate_series(&cases))
            .zip(rate_series(&deaths))
        {
            rates[i] = (c, d);
        }
    }

    log::debug!(
        "Computed rates for {} records across {counties} counties",
        records.len()
    );

    for (record, (cases_rate, deaths_rate)) in records.iter_mut().zip(rates) {
        record.cases_rate = Some(cases_rate);
        record.deaths_rate = Some(deaths_rate);
    }

    records.sort_by_key(|r| r.date);
    records
}

/// Day-over-day fractional change of a series, with the first element and
/// any NaN or infinite change replaced by `0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn rate_series(values: &[u64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }

    let mut rates = Vec::with_capacity(values.len());
    rates.push(0.0);
    rates.extend(values.windows(2).map(|w| {
        let (prev, curr) = (w[0] as f64, w[1] as f64);
        let rate = (curr - prev) / prev;
        if rate.is_finite() { rate } else { 0.0 }
    }));
    rates
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use covid_map_cases_models::CaseRecord;

    use super::*;
    use crate::pipeline::build;

    fn case(day: u32, county: &str, cases: u64, deaths: u64) -> CaseRecord {
        CaseRecord {
            date: NaiveDate::from_ymd_opt(2020, 6, day).unwrap(),
            county: county.to_string(),
            state: "New York".to_string(),
            fips: None,
            cases,
            deaths,
        }
    }

    fn assert_close(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "{actual:?} vs {expected:?}");
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).abs() < 1e-12, "{actual:?} vs {expected:?}");
        }
    }

    #[test]
    fn zero_denominators_become_zero() {
        assert_close(&rate_series(&[10, 20, 0, 5]), &[0.0, 1.0, -1.0, 0.0]);
    }

    #[test]
    fn zero_to_zero_is_zero() {
        assert_close(&rate_series(&[0, 0, 4, 6]), &[0.0, 0.0, 0.0, 0.5]);
    }

    #[test]
    fn single_value_series_is_zero() {
        assert_close(&rate_series(&[42]), &[0.0]);
        assert!(rate_series(&[]).is_empty());
    }

    #[test]
    fn single_record_county_gets_zero_rate() {
        let records = annotate(build(&[case(1, "Albany", 9, 1)], &[]));
        assert_eq!(records[0].cases_rate, Some(0.0));
        assert_eq!(records[0].deaths_rate, Some(0.0));
    }

    #[test]
    fn rates_follow_date_order_within_county() {
        // Input deliberately out of date order within the county.
        let input = vec![
            case(3, "Albany", 30, 0),
            case(1, "Albany", 10, 0),
            case(2, "Albany", 20, 0),
        ];
        let records = annotate(build(&input, &[]));
        let rates: Vec<f64> = records.iter().map(|r| r.cases_rate.unwrap()).collect();
        assert_close(&rates, &[0.0, 1.0, 0.5]);
    }

    #[test]
    fn preserves_date_sorted_order() {
        let input = build(
            &[
                case(1, "Erie", 1, 0),
                case(1, "Albany", 2, 0),
                case(2, "Erie", 2, 1),
                case(2, "Albany", 4, 0),
                case(3, "Erie", 3, 1),
            ],
            &[],
        );
        let before: Vec<(NaiveDate, String)> =
            input.iter().map(|r| (r.date, r.county.clone())).collect();

        let output = annotate(input);
        let after: Vec<(NaiveDate, String)> =
            output.iter().map(|r| (r.date, r.county.clone())).collect();

        assert_eq!(before, after);
    }

    #[test]
    fn counties_are_independent() {
        let output = annotate(build(
            &[
                case(1, "Erie", 100, 10),
                case(1, "Albany", 1, 0),
                case(2, "Erie", 150, 10),
                case(2, "Albany", 1000, 0),
            ],
            &[],
        ));

        let erie: Vec<f64> = output
            .iter()
            .filter(|r| r.county == "Erie")
            .map(|r| r.cases_rate.unwrap())
            .collect();
        assert_close(&erie, &[0.0, 0.5]);

        let erie_deaths: Vec<f64> = output
            .iter()
            .filter(|r| r.county == "Erie")
            .map(|r| r.deaths_rate.unwrap())
            .collect();
        assert_close(&erie_deaths, &[0.0, 0.0]);
    }
}
