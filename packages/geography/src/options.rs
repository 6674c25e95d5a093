//! Lookups derived from the corrected county collection.

use std::collections::BTreeSet;

use covid_map_geography_models::CountyOption;
use geojson::FeatureCollection;

use crate::collection::{feature_county, feature_id};

/// County picker options, one per named feature, sorted by label.
#[must_use]
pub fn county_options(collection: &FeatureCollection) -> Vec<CountyOption> {
    let mut options: Vec<CountyOption> = collection
        .features
        .iter()
        .filter_map(feature_county)
        .map(CountyOption::from_name)
        .collect();
    options.sort();
    options
}

/// All numeric join ids carried by the collection.
#[must_use]
pub fn feature_ids(collection: &FeatureCollection) -> BTreeSet<u64> {
    collection.features.iter().filter_map(feature_id).collect()
}

/// Returns the tabular join keys that resolve to no feature.
///
/// An empty result means every record can be drawn on the map.
#[must_use]
pub fn unresolved_ids(
    collection: &FeatureCollection,
    ids: impl IntoIterator<Item = u64>,
) -> BTreeSet<u64> {
    let known = feature_ids(collection);
    ids.into_iter().filter(|id| !known.contains(id)).collect()
}
