//! Reading and writing county feature collections.

use covid_map_geography_models::{COUNTY_KEY, ID_KEY};
use geo::MultiPolygon;
use geojson::{Feature, FeatureCollection, GeoJson};

use crate::GeoError;

/// Parses a `GeoJSON` document that must be a `FeatureCollection`.
///
/// # Errors
///
/// Returns [`GeoError::GeoJson`] if the text is not valid `GeoJSON` or is
/// not a `FeatureCollection`.
pub fn parse_collection(text: &str) -> Result<FeatureCollection, GeoError> {
    let geojson: GeoJson = text.parse()?;
    let collection = FeatureCollection::try_from(geojson)?;
    log::debug!("Parsed {} county features", collection.features.len());
    Ok(collection)
}

/// Serializes a collection back to a `GeoJSON` string.
///
/// # Errors
///
/// Returns [`GeoError::Json`] if serialization fails.
pub fn to_json_string(collection: &FeatureCollection) -> Result<String, GeoError> {
    Ok(serde_json::to_string(collection)?)
}

/// Reads the numeric join id from a feature's properties.
///
/// Accepts either a JSON number or a numeric string.
#[must_use]
pub fn feature_id(feature: &Feature) -> Option<u64> {
    let value = feature.property(ID_KEY)?;
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// Reads the county display name from a feature's properties.
#[must_use]
pub fn feature_county(feature: &Feature) -> Option<&str> {
    feature
        .property(COUNTY_KEY)
        .and_then(serde_json::Value::as_str)
}

/// Converts a feature's geometry into a [`MultiPolygon`].
///
/// Handles both `Polygon` and `MultiPolygon` geometry types.
///
/// # Errors
///
/// Returns [`GeoError::Geometry`] if the feature has no geometry or the
/// geometry is not polygonal.
pub fn to_multipolygon(feature: &Feature) -> Result<MultiPolygon<f64>, GeoError> {
    let Some(geometry) = feature.geometry.clone() else {
        return Err(GeoError::Geometry {
            message: "feature has no geometry".to_string(),
        });
    };

    let geo_geom: geo::Geometry<f64> = geometry.try_into()?;
    match geo_geom {
        geo::Geometry::MultiPolygon(mp) => Ok(mp),
        geo::Geometry::Polygon(p) => Ok(MultiPolygon(vec![p])),
        _ => Err(GeoError::Geometry {
            message: "expected Polygon or MultiPolygon geometry".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": { "county": "Albany", "id": 36001, "pop": 305506 },
                "geometry": {
                    "type": "Polygon",
                    "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0], [0.0, 0.0]]]
                }
            },
            {
                "type": "Feature",
                "properties": { "county": "Allegany", "id": "36003" },
                "geometry": { "type": "Point", "coordinates": [0.5, 0.5] }
            }
        ]
    }"#;

    #[test]
    fn parses_feature_collection() {
        let collection = parse_collection(SAMPLE).unwrap();
        assert_eq!(collection.features.len(), 2);
        assert_eq!(feature_county(&collection.features[0]), Some("Albany"));
        assert_eq!(feature_id(&collection.features[0]), Some(36001));
    }

    #[test]
    fn reads_string_ids() {
        let collection = parse_collection(SAMPLE).unwrap();
        assert_eq!(feature_id(&collection.features[1]), Some(36003));
    }

    #[test]
    fn rejects_non_collection() {
        let point = r#"{ "type": "Point", "coordinates": [0.0, 0.0] }"#;
        assert!(parse_collection(point).is_err());
    }

    #[test]
    fn polygon_becomes_multipolygon() {
        let collection = parse_collection(SAMPLE).unwrap();
        let mp = to_multipolygon(&collection.features[0]).unwrap();
        assert_eq!(mp.0.len(), 1);
    }

    #[test]
    fn point_geometry_is_rejected() {
        let collection = parse_collection(SAMPLE).unwrap();
        assert!(matches!(
            to_multipolygon(&collection.features[1]),
            Err(GeoError::Geometry { .. })
        ));
    }

    #[test]
    fn serializes_back_to_geojson() {
        let collection = parse_collection(SAMPLE).unwrap();
        let text = to_json_string(&collection).unwrap();
        let reparsed = parse_collection(&text).unwrap();
        assert_eq!(reparsed.features.len(), 2);
    }
}
