//! County FIPS code utilities.
//!
//! The tabular side of the pipeline carries FIPS codes as zero-padded
//! strings (`"36061"`), while the county boundary features carry the same
//! code as a bare integer `id` property (`36061`). These helpers convert
//! between the two so join keys compare by equality.

/// County FIPS codes of the five New York City boroughs
/// (Bronx, Kings, New York, Queens, Richmond).
pub const NYC_BOROUGH_FIPS: &[&str] = &["36005", "36047", "36061", "36081", "36085"];

/// Width of a full county FIPS code (state + county).
pub const COUNTY_FIPS_WIDTH: usize = 5;

/// Parses a county FIPS string into the numeric id used by boundary
/// features.
///
/// Leading/trailing whitespace is ignored. Returns `None` for empty or
/// non-numeric input.
#[must_use]
pub fn fips_to_id(fips: &str) -> Option<u64> {
    let trimmed = fips.trim();
    if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Formats a numeric feature id as a zero-padded county FIPS string.
#[must_use]
pub fn id_to_fips(id: u64) -> String {
    format!("{id:0width$}", width = COUNTY_FIPS_WIDTH)
}

/// Returns the two-digit state FIPS prefix of a county FIPS code.
///
/// Returns `None` unless the code is a full five-digit county code.
#[must_use]
pub fn state_fips(county_fips: &str) -> Option<&str> {
    if county_fips.len() == COUNTY_FIPS_WIDTH
        && county_fips.bytes().all(|b| b.is_ascii_digit())
    {
        Some(&county_fips[..2])
    } else {
        None
    }
}

/// Whether the code belongs to one of the five NYC boroughs.
#[must_use]
pub fn is_nyc_borough(county_fips: &str) -> bool {
    NYC_BOROUGH_FIPS.contains(&county_fips)
}
