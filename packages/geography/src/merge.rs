//! Dissolves several county features into one composite region.
//!
//! The county boundary source draws each NYC borough as its own county,
//! while the case table reports the five boroughs as a single "New York
//! City" row. [`merge`] unions the borough polygons, drops the originals,
//! and appends one composite feature whose `id` matches the case table's
//! join key.

use std::collections::BTreeSet;

use covid_map_geography_models::{COUNTY_KEY, ID_KEY, POPULATION_KEY, PropertyOverrides};
use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, JsonObject};

use crate::GeoError;
use crate::collection::{feature_id, to_multipolygon};

/// Dissolves the features at `indices` into a single feature.
///
/// The composite takes its properties from the feature at `indices[0]`,
/// overridden by `overrides`. Its geometry is the planar union of every
/// dissolved geometry, so shared borders disappear. The dissolved
/// features are removed and the composite is appended at the end.
/// Duplicate indices are ignored.
///
/// The input collection is left untouched; a new collection is returned.
///
/// # Errors
///
/// * [`GeoError::InvalidInput`] if `indices` is empty.
/// * [`GeoError::InvalidIndex`] if an index is out of bounds.
/// * [`GeoError::DuplicateId`] if `overrides.id` is already carried by a
///   feature in the input collection.
/// * [`GeoError::Geometry`] / [`GeoError::GeoJson`] if a dissolved
///   feature has no polygonal geometry.
pub fn merge(
    collection: &FeatureCollection,
    indices: &[usize],
    overrides: &PropertyOverrides,
) -> Result<FeatureCollection, GeoError> {
    let Some(&first) = indices.first() else {
        return Err(GeoError::InvalidInput {
            message: "no features selected for merge".to_string(),
        });
    };

    let len = collection.features.len();
    if let Some(&index) = indices.iter().find(|&&i| i >= len) {
        return Err(GeoError::InvalidIndex { index, len });
    }

    if collection
        .features
        .iter()
        .any(|f| feature_id(f) == Some(overrides.id))
    {
        return Err(GeoError::DuplicateId { id: overrides.id });
    }

    let selected: BTreeSet<usize> = indices.iter().copied().collect();

    let polygons = selected
        .iter()
        .map(|&i| to_multipolygon(&collection.features[i]))
        .collect::<Result<Vec<_>, _>>()?;

    let joined = dissolve(&polygons);
    if joined.0.is_empty() {
        log::warn!(
            "Dissolving {} features produced an empty geometry",
            selected.len()
        );
    }

    let properties = composite_properties(&collection.features[first], overrides);

    let mut features = collection.features.clone();
    // Highest index first so earlier positions stay valid.
    for &i in selected.iter().rev() {
        features.remove(i);
    }

    features.push(Feature {
        bbox: None,
        geometry: Some(geojson::Geometry::new(geojson::Value::from(&joined))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    });

    log::info!(
        "Merged {} features into '{}' (id {}), {} features remain",
        selected.len(),
        overrides.name,
        overrides.id,
        features.len()
    );

    Ok(FeatureCollection {
        bbox: None,
        features,
        foreign_members: collection.foreign_members.clone(),
    })
}

/// Planar union of all polygons.
#[must_use]
pub fn dissolve(polygons: &[MultiPolygon<f64>]) -> MultiPolygon<f64> {
    geo::unary_union(polygons)
}

/// Resolves feature ids to their positions in the collection, preserving
/// the order of `ids`.
///
/// # Errors
///
/// Returns [`GeoError::UnknownId`] for the first id no feature carries.
pub fn indices_for_ids(
    collection: &FeatureCollection,
    ids: &[u64],
) -> Result<Vec<usize>, GeoError> {
    ids.iter()
        .map(|&id| {
            collection
                .features
                .iter()
                .position(|f| feature_id(f) == Some(id))
                .ok_or(GeoError::UnknownId { id })
        })
        .collect()
}

fn composite_properties(template: &Feature, overrides: &PropertyOverrides) -> JsonObject {
    let mut properties = template.properties.clone().unwrap_or_default();
    properties.insert(COUNTY_KEY.to_string(), overrides.name.clone().into());
    properties.insert(ID_KEY.to_string(), overrides.id.into());
    properties.insert(POPULATION_KEY.to_string(), overrides.population.into());
    properties
}
