#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary property types.
//!
//! The county boundary collection is a `GeoJSON` `FeatureCollection` whose
//! feature properties carry the county name, a numeric id (the county FIPS
//! code) and a population figure. These types name those properties and
//! describe the composite region produced by dissolving several counties
//! into one.

pub mod fips;

use serde::{Deserialize, Serialize};

/// Feature property holding the county display name.
pub const COUNTY_KEY: &str = "county";

/// Feature property holding the numeric join id (matches tabular `fips`).
pub const ID_KEY: &str = "id";

/// Feature property holding the county population.
pub const POPULATION_KEY: &str = "pop";

/// Property values written onto a dissolved composite region.
///
/// Everything else is inherited from the first dissolved feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyOverrides {
    /// Display name of the merged region (e.g. "New York City").
    pub name: String,
    /// New numeric id. Must not collide with any surviving feature id.
    pub id: u64,
    /// Population of the merged region.
    pub population: u64,
}

/// A label/value pair used to populate a county picker.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountyOption {
    /// Text shown to the user.
    pub label: String,
    /// Value submitted on selection.
    pub value: String,
}

impl CountyOption {
    /// Builds an option whose label and value are both the county name.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        Self {
            label: name.to_string(),
            value: name.to_string(),
        }
    }
}
