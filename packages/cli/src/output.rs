//! Writes the artifacts the map and chart layers read.

use std::path::Path;

use covid_map_cases_models::EnrichedRecord;
use geojson::FeatureCollection;

/// File name of the corrected county boundaries.
pub const COUNTIES_FILE: &str = "counties.geojson";

/// File name of the enriched case table.
pub const RECORDS_FILE: &str = "enriched.csv";

/// Writes the merged feature collection as `GeoJSON`.
///
/// # Errors
///
/// Returns an error if serialization or the file write fails.
pub fn write_counties(
    dir: &Path,
    collection: &FeatureCollection,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(COUNTIES_FILE);
    let text = covid_map_geography::collection::to_json_string(collection)?;
    std::fs::write(&path, text)?;
    log::info!(
        "Wrote {} features to {}",
        collection.features.len(),
        path.display()
    );
    Ok(())
}

/// Writes the enriched records as CSV, one row per (county, date).
///
/// # Errors
///
/// Returns an error if the file cannot be created or a row fails to
/// serialize.
pub fn write_records(
    dir: &Path,
    records: &[EnrichedRecord],
) -> Result<(), Box<dyn std::error::Error>> {
    let path = dir.join(RECORDS_FILE);
    let mut writer = csv::Writer::from_path(&path)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    log::info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
