#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! County boundary loading and borough dissolve.
//!
//! Parses the county `GeoJSON` `FeatureCollection`, dissolves a chosen set
//! of counties (the five NYC boroughs) into a single composite feature,
//! and derives the lookups the map layer needs from the corrected
//! collection.

pub mod collection;
pub mod merge;
pub mod options;

use thiserror::Error;

/// Errors that can occur during geography operations.
#[derive(Debug, Error)]
pub enum GeoError {
    /// A merge index does not address a feature in the collection.
    #[error("Invalid index {index} for collection of {len} features")]
    InvalidIndex {
        /// The offending index.
        index: usize,
        /// Number of features in the collection.
        len: usize,
    },

    /// The merge request itself is unusable (e.g. no indices).
    #[error("Invalid input: {message}")]
    InvalidInput {
        /// Description of what went wrong.
        message: String,
    },

    /// No feature carries the requested id.
    #[error("No feature with id {id}")]
    UnknownId {
        /// The id that was looked up.
        id: u64,
    },

    /// The composite id is already used by a feature in the collection.
    #[error("Feature id {id} is already in use")]
    DuplicateId {
        /// The colliding id.
        id: u64,
    },

    /// A feature's geometry is missing or not polygonal.
    #[error("Geometry error: {message}")]
    Geometry {
        /// Description of what went wrong.
        message: String,
    },

    /// `GeoJSON` parsing or conversion failed.
    #[error("GeoJSON error: {0}")]
    GeoJson(#[from] geojson::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
