//! Row filters applied between the join and rate computation.
//!
//! These change which records are adjacent within a county's series, so
//! they must run before [`crate::rate::annotate`].

use covid_map_cases_models::EnrichedRecord;

/// County name the case table uses for cases not attributed to a county.
pub const UNKNOWN_COUNTY: &str = "Unknown";

/// Keeps only records for `state`.
#[must_use]
pub fn in_state(mut records: Vec<EnrichedRecord>, state: &str) -> Vec<EnrichedRecord> {
    records.retain(|r| r.state == state);
    records
}

/// Drops records whose county is [`UNKNOWN_COUNTY`].
#[must_use]
pub fn without_unknown(mut records: Vec<EnrichedRecord>) -> Vec<EnrichedRecord> {
    records.retain(|r| r.county != UNKNOWN_COUNTY);
    records
}
