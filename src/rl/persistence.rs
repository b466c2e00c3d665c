//! Model persistence for trained policies
//!
//! This module provides functionality to save and load trained networks
//! together with the configuration they were built for. It uses Burn's
//! Record system for serialization.
//!
//! A checkpoint is two files:
//! - `<path>` - Network weights (Burn named-mpk record format)
//! - `<path>.meta.json` - Metadata as JSON
//!
//! Loading validates the metadata before touching the weights: an agent must
//! never come up with a half-loaded or mismatched parameter set, so any
//! inconsistency is a fatal construction error.

use std::path::Path;

use anyhow::{bail, Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};

use super::config::AgentConfig;
use super::network::{DuelingQNetwork, DuelingQNetworkConfig};

/// Metadata saved with the model
///
/// Contains the configuration needed to rebuild the network architecture the
/// weights belong to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Agent configuration the checkpoint was produced for
    pub config: AgentConfig,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    /// Create new metadata for a configuration
    pub fn new(config: AgentConfig) -> Self {
        Self {
            config,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save a trained network to a file
///
/// Serializes the network weights and the agent configuration to the
/// specified path. Creates parent directories if they don't exist.
///
/// # Arguments
///
/// * `network` - The network to save
/// * `config` - The agent configuration the network was built for
/// * `path` - Path where the model should be saved (without extension)
pub fn save_network<B: Backend>(
    network: &DuelingQNetwork<B>,
    config: &AgentConfig,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = network.clone().into_record();
    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let metadata = ModelMetadata::new(config.clone());
    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a trained network from a file
///
/// Reads the metadata sidecar, validates it, rebuilds the architecture it
/// describes, and loads the weight record into it. Fails on a missing or
/// unreadable checkpoint, malformed metadata, an invalid configuration, or
/// weights that don't match the rebuilt architecture.
///
/// # Arguments
///
/// * `path` - Path to the saved model file (without extension)
/// * `device` - Device to load the model onto
///
/// # Returns
///
/// A tuple containing the loaded network and its metadata
pub fn load_network<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(DuelingQNetwork<B>, ModelMetadata)> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    if let Err(message) = metadata.config.validate() {
        bail!("Invalid checkpoint configuration: {}", message);
    }

    // Rebuild the architecture the weights were recorded for
    let network_config = DuelingQNetworkConfig {
        input_frames: metadata.config.frame_history,
        action_count: metadata.config.action_count,
        frame_size: metadata.config.frame_size,
        ..DuelingQNetworkConfig::default()
    };
    let network = network_config.init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}

/// Load a trained network, requiring it to match an expected configuration
///
/// Same as [`load_network`], but additionally fails if the checkpoint was
/// produced for a different configuration than the caller expects (for
/// example a different action count).
pub fn load_network_with_config<B: Backend>(
    path: &Path,
    expected: &AgentConfig,
    device: &B::Device,
) -> Result<(DuelingQNetwork<B>, ModelMetadata)> {
    let (network, metadata) = load_network(path, device)?;

    if metadata.config != *expected {
        bail!(
            "Checkpoint configuration {:?} does not match expected {:?}",
            metadata.config,
            expected
        );
    }

    Ok((network, metadata))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::backend::{default_device, InferenceBackend};
    use burn::tensor::{Distribution, Tensor};
    use tempfile::TempDir;

    #[test]
    fn test_metadata_creation() {
        let metadata = ModelMetadata::new(AgentConfig::new(7));

        assert_eq!(metadata.config.action_count, 7);
        assert_eq!(metadata.config.frame_history, 4);
        assert!(!metadata.version.is_empty());
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = ModelMetadata::new(AgentConfig::default());

        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ModelMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized.config, metadata.config);
        assert_eq!(deserialized.version, metadata.version);
    }

    #[test]
    fn test_save_load_round_trip() {
        let device = default_device();
        let config = AgentConfig::default();
        let network_config = DuelingQNetworkConfig::new(config.action_count);
        let network = network_config.init::<InferenceBackend>(&device);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy");
        save_network(&network, &config, &path).unwrap();

        let (loaded, metadata) = load_network::<InferenceBackend>(&path, &device).unwrap();
        assert_eq!(metadata.config, config);

        // Full-precision storage: the loaded network scores identically
        let state = Tensor::<InferenceBackend, 4>::random(
            [1, 4, 84, 84],
            Distribution::Uniform(0.0, 1.0),
            &device,
        );
        let before: Vec<f32> = network.forward(state.clone()).into_data().to_vec().unwrap();
        let after: Vec<f32> = loaded.forward(state).into_data().to_vec().unwrap();
        assert_eq!(before, after);
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let device = default_device();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing");

        assert!(load_network::<InferenceBackend>(&path, &device).is_err());
    }

    #[test]
    fn test_load_rejects_config_mismatch() {
        let device = default_device();
        let config = AgentConfig::new(12);
        let network = DuelingQNetworkConfig::new(12).init::<InferenceBackend>(&device);

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy");
        save_network(&network, &config, &path).unwrap();

        let expected = AgentConfig::new(7);
        let result = load_network_with_config::<InferenceBackend>(&path, &expected, &device);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_metadata() {
        let device = default_device();
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("policy");

        // Metadata describing an impossible configuration
        let metadata = ModelMetadata::new(AgentConfig::new(0));
        let meta_json = serde_json::to_string(&metadata).unwrap();
        std::fs::write(path.with_extension("meta.json"), meta_json).unwrap();

        assert!(load_network::<InferenceBackend>(&path, &device).is_err());
    }
}
