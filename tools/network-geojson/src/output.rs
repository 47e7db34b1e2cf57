use anyhow::{Context, Result};
use geojson::FeatureCollection;
use std::path::Path;
use transit_network::export::feature_collection_object;
use transit_network::{NetworkConfig, NetworkDocument};

/// Read network settings from a JSON file
pub fn read_config(path: &Path) -> Result<NetworkConfig> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    NetworkConfig::from_json_str(&json).context("Failed to parse network config")
}

/// Read and validate a network document
pub fn read_network(path: &Path, config: &NetworkConfig) -> Result<NetworkDocument> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    NetworkDocument::from_json_str(&json, &config.parse_options())
        .with_context(|| format!("Invalid network document {}", path.display()))
}

/// Write a feature collection as pretty-printed GeoJSON
///
/// Features are written with `properties` ahead of `geometry`.
pub fn write_feature_collection(collection: FeatureCollection, output_path: &Path) -> Result<()> {
    log::info!(
        "Writing {} features to {}",
        collection.features.len(),
        output_path.display()
    );

    let json_string = serde_json::to_string_pretty(&feature_collection_object(&collection))
        .context("Failed to serialize GeoJSON")?;

    std::fs::write(output_path, json_string)
        .with_context(|| format!("Failed to write GeoJSON to {}", output_path.display()))?;

    Ok(())
}
