use anyhow::{bail, Context, Result};
use clap::Parser;
use std::path::PathBuf;
use transit_network::export::feature_collection;
use transit_network::{
    JointPolicy, NetworkConfig, NetworkProvider, RouteIdentifier, StaticNetworkProvider,
};

mod output;
mod summary;

use output::{read_config, read_network, write_feature_collection};
use summary::NetworkStats;

#[derive(Parser, Debug)]
#[command(
    name = "network-geojson",
    author,
    version,
    about = "Export a transit network's sections and routes as GeoJSON",
    long_about = "Loads a network document (stops, buses, sections, routes and rides as JSON), \
                  derives section lengths from their coordinate paths, composes every route \
                  from its sections and writes the result as a GeoJSON FeatureCollection of \
                  LineString features.\n\n\
                  Sections are written first, then routes, both ordered by id."
)]
struct Args {
    /// Input network JSON file
    #[arg(short, long)]
    input: PathBuf,

    /// Output GeoJSON file
    #[arg(short, long)]
    output: PathBuf,

    /// Only export these routes (repeatable); sections are then omitted
    #[arg(short, long = "route")]
    routes: Vec<u64>,

    /// Network settings JSON file (transition_policy, joint_policy, validate_coordinates)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Drop the repeated point where consecutive sections meet
    #[arg(long)]
    deduplicate_joints: bool,

    /// Accept coordinates outside the valid longitude/latitude ranges
    #[arg(long)]
    lenient_coordinates: bool,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if args.verbose { "debug" } else { "info" }),
    )
    .format_timestamp(None)
    .init();

    log::info!("Input: {}", args.input.display());
    log::info!("Output: {}", args.output.display());

    // Validate input file exists
    if !args.input.exists() {
        bail!("Input file does not exist: {}", args.input.display());
    }

    let mut config = match &args.config {
        Some(path) => {
            log::info!("Config: {}", path.display());
            read_config(path).context("Failed to load config")?
        }
        None => NetworkConfig::default(),
    };
    if args.deduplicate_joints {
        config.joint_policy = JointPolicy::Deduplicate;
    }
    if args.lenient_coordinates {
        config.validate_coordinates = false;
    }
    log::debug!("{:?}", config);

    let document = read_network(&args.input, &config).context("Failed to load network")?;
    let provider = StaticNetworkProvider::from_document(document, config);

    let collection = if args.routes.is_empty() {
        provider.feature_collection()
    } else {
        let features = args
            .routes
            .iter()
            .map(|&id| provider.route_geojson(RouteIdentifier::new(id)))
            .collect::<Result<Vec<_>, _>>()
            .context("Failed to export selected routes")?;
        feature_collection(features)
    };

    write_feature_collection(collection, &args.output).context("Failed to write GeoJSON")?;

    NetworkStats::collect(&provider).log_summary();
    log::info!("Done!");

    Ok(())
}
