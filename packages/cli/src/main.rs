#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Runs the county merge and case metric pipelines over local input files.
//!
//! Reads the county boundary `GeoJSON`, the case CSV and the population
//! table, dissolves the NYC boroughs into one region, enriches the case
//! table, and writes `counties.geojson` and `enriched.csv` for the map
//! and chart front end.

mod config;
mod output;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use covid_map_geography::collection::parse_collection;
use covid_map_geography::merge::merge;
use covid_map_geography::options::{county_options, unresolved_ids};
use covid_map_geography_models::fips::{fips_to_id, id_to_fips, is_nyc_borough, state_fips};
use geojson::FeatureCollection;

use crate::config::RunConfig;

#[derive(Parser)]
#[command(name = "covid_map_cli", about = "County case metrics pipeline")]
struct Cli {
    /// Run configuration (TOML). Defaults to the embedded NYC config.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge boundaries, enrich the case table, and write both outputs
    Run {
        /// County boundary `GeoJSON` file
        #[arg(long)]
        geojson: PathBuf,
        /// Case table CSV (`date,county,state,fips,cases,deaths`)
        #[arg(long)]
        cases: PathBuf,
        /// Population table (`.json` or `.csv`)
        #[arg(long)]
        population: PathBuf,
        /// Directory to write `counties.geojson` and `enriched.csv` into
        #[arg(long, default_value = "data/generated")]
        output_dir: PathBuf,
    },
    /// Print the county names of the merged boundaries, sorted
    Counties {
        /// County boundary `GeoJSON` file
        #[arg(long)]
        geojson: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => RunConfig::load(path)?,
        None => RunConfig::embedded(),
    };

    match cli.command {
        Commands::Run {
            geojson,
            cases,
            population,
            output_dir,
        } => run(&config, &geojson, &cases, &population, &output_dir)?,
        Commands::Counties { geojson } => {
            let merged = merged_counties(&config, &geojson)?;
            for option in county_options(&merged) {
                println!("{}", option.label);
            }
        }
    }

    Ok(())
}

fn merged_counties(
    config: &RunConfig,
    geojson: &Path,
) -> Result<FeatureCollection, Box<dyn std::error::Error>> {
    log::info!("Reading county boundaries from {}", geojson.display());
    let collection = parse_collection(&std::fs::read_to_string(geojson)?)?;
    let indices = config.merge.indices(&collection)?;
    Ok(merge(&collection, &indices, &config.merge.overrides())?)
}

fn run(
    config: &RunConfig,
    geojson: &Path,
    cases: &Path,
    population: &Path,
    output_dir: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let counties = merged_counties(config, geojson)?;

    let cases = covid_map_cases::load::load_cases(cases)?;
    let population = covid_map_cases::load::load_population(population)?;
    let records = covid_map_cases::process(&cases, &population, &config.filter);

    let missing_fips = records.iter().filter(|r| r.fips.is_none()).count();
    if missing_fips > 0 {
        log::warn!("{missing_fips} records have no fips and cannot be mapped");
    }

    let boroughs = records
        .iter()
        .filter(|r| r.fips.as_deref().is_some_and(is_nyc_borough))
        .count();
    if boroughs > 0 {
        log::warn!(
            "{boroughs} records carry borough fips codes dissolved into {}",
            config.merge.name
        );
    }

    let ids: BTreeSet<u64> = records
        .iter()
        .filter_map(|r| r.fips.as_deref().and_then(fips_to_id))
        .collect();
    let unresolved = unresolved_ids(&counties, ids);
    if !unresolved.is_empty() {
        let codes: Vec<String> = unresolved.iter().map(|&id| id_to_fips(id)).collect();
        let states: BTreeSet<&str> = codes.iter().filter_map(|c| state_fips(c)).collect();
        log::warn!(
            "{} fips codes (state prefixes {:?}) match no county boundary: {}",
            codes.len(),
            states,
            codes.join(", ")
        );
    }

    std::fs::create_dir_all(output_dir)?;
    output::write_counties(output_dir, &counties)?;
    output::write_records(output_dir, &records)?;

    Ok(())
}
