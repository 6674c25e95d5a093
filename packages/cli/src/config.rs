//! Run configuration, read from TOML.
//!
//! The default configuration is embedded at compile time; `--config`
//! replaces it with a file on disk.

use std::path::Path;

use covid_map_cases::PipelineOptions;
use covid_map_geography::GeoError;
use covid_map_geography::merge::indices_for_ids;
use covid_map_geography_models::PropertyOverrides;
use geojson::FeatureCollection;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG: &str = include_str!("../config/default.toml");

/// Full configuration for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    pub merge: MergeConfig,
    #[serde(default)]
    pub filter: PipelineOptions,
}

/// Which features to dissolve and what to call the result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeConfig {
    pub target: MergeTarget,
    pub name: String,
    pub id: u64,
    pub population: u64,
}

/// How the features to dissolve are selected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MergeTarget {
    /// Positions in the feature collection. The first entry supplies the
    /// inherited properties.
    Indices { indices: Vec<usize> },
    /// Feature `id` property values, resolved to positions at run time.
    Ids { ids: Vec<u64> },
}

impl RunConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded TOML fails to parse. It is a compile-time
    /// constant, so a failure is a development error caught by tests.
    #[must_use]
    pub fn embedded() -> Self {
        toml::de::from_str(DEFAULT_CONFIG)
            .unwrap_or_else(|e| panic!("Failed to parse embedded run config: {e}"))
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid
    /// run configuration.
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let text = std::fs::read_to_string(path)?;
        let config = toml::de::from_str(&text)
            .map_err(|e| format!("Invalid config {}: {e}", path.display()))?;
        Ok(config)
    }
}

impl MergeConfig {
    /// Properties written onto the composite feature.
    #[must_use]
    pub fn overrides(&self) -> PropertyOverrides {
        PropertyOverrides {
            name: self.name.clone(),
            id: self.id,
            population: self.population,
        }
    }

    /// Resolves the target to positions in `collection`.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError::UnknownId`] if an id target names a feature
    /// that is not present.
    pub fn indices(&self, collection: &FeatureCollection) -> Result<Vec<usize>, GeoError> {
        match &self.target {
            MergeTarget::Indices { indices } => Ok(indices.clone()),
            MergeTarget::Ids { ids } => indices_for_ids(collection, ids),
        }
    }
}
