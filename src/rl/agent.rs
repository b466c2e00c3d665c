//! Deployed agents: one decision per observation, per tick
//!
//! Two agent variants implement the same capability, differing only in who
//! stacks frames:
//!
//! - [`FrameAgent`] (frame mode) receives raw color frames and does all
//!   preprocessing and stacking itself.
//! - [`StackedAgent`] (stacked mode) receives a pre-stacked, normalized
//!   state tensor from a harness that maintains its own frame window.
//!
//! The two modes are deliberately distinct types selected at construction.
//! They produce different first-tick behavior whenever the harness's own
//! stacking policy differs from [`FrameStack`]'s cold-start rule, so a
//! single type switching on input shape would leave that contract
//! ambiguous.
//!
//! Calls are synchronous and must be serialized by the caller: an agent owns
//! its frame window outright and provides no internal locking.

use std::path::Path;

use anyhow::{bail, Result};
use burn::tensor::{backend::Backend, Tensor};
use image::RgbImage;

use crate::vision::{preprocess, FrameStack, FRAME_SIZE};

use super::action::select_greedy;
use super::config::AgentConfig;
use super::network::DuelingQNetwork;
use super::persistence::load_network_with_config;

/// A policy that maps one observation to one discrete action
///
/// Implementations are deterministic: the same observation history always
/// yields the same action for fixed weights.
pub trait PolicyAgent {
    /// Input the agent consumes each tick
    type Observation;

    /// Decide the action for this tick's observation
    ///
    /// Returns an index in `[0, action_count)`. Fails only on an input
    /// contract violation; there is nothing transient to retry.
    fn act(&mut self, observation: Self::Observation) -> Result<usize>;
}

/// Frame-mode agent: preprocesses and stacks raw frames itself
///
/// Holds the only mutable state in the pipeline, the sliding frame window.
/// The first observation of an episode fills the whole window (see
/// [`FrameStack`]), so motion reads as zero until real history accumulates.
///
/// # Example
///
/// ```rust,ignore
/// use ml_platformer::rl::{default_device, AgentConfig, FrameAgent, InferenceBackend, PolicyAgent};
/// use std::path::Path;
///
/// let config = AgentConfig::default();
/// let mut agent = FrameAgent::<InferenceBackend>::from_checkpoint(
///     Path::new("models/platformer"),
///     &config,
///     default_device(),
/// )?;
///
/// let action = agent.act(observation)?;
/// ```
pub struct FrameAgent<B: Backend> {
    /// Trained q-network
    network: DuelingQNetwork<B>,

    /// Sliding window of recent preprocessed frames
    stack: FrameStack,

    /// Agent configuration, matching the loaded checkpoint
    config: AgentConfig,

    /// Device the network runs on
    device: B::Device,
}

impl<B: Backend> FrameAgent<B> {
    /// Build an agent around an already-constructed network
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid or its frame size differs
    /// from the fixed preprocessor output.
    pub fn new(network: DuelingQNetwork<B>, config: AgentConfig, device: B::Device) -> Self {
        config.validate().expect("invalid agent configuration");
        assert_eq!(
            config.frame_size, FRAME_SIZE as usize,
            "frame mode preprocesses to {0}x{0} frames",
            FRAME_SIZE
        );

        let stack = FrameStack::new(config.frame_history);
        Self {
            network,
            stack,
            config,
            device,
        }
    }

    /// Load a checkpoint and build an agent from it
    ///
    /// Fails if the checkpoint is missing or corrupt, or if it was produced
    /// for a different configuration than `config`.
    pub fn from_checkpoint(path: &Path, config: &AgentConfig, device: B::Device) -> Result<Self> {
        let (network, _) = load_network_with_config::<B>(path, config, &device)?;
        Ok(Self::new(network, config.clone(), device))
    }

    /// Forget all frame history, as at the start of an episode
    pub fn reset(&mut self) {
        self.stack.clear();
    }

    /// The loaded network (shared, read-only)
    pub fn network(&self) -> &DuelingQNetwork<B> {
        &self.network
    }

    /// The agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

impl<B: Backend> PolicyAgent for FrameAgent<B> {
    type Observation = RgbImage;

    fn act(&mut self, observation: RgbImage) -> Result<usize> {
        let frame = preprocess(&observation)?;
        self.stack.push(frame);

        let state = self.stack.to_state::<B>(&self.device);
        let q_values = self.network.forward(state.unsqueeze_dim(0));

        let scores: Vec<f32> = q_values
            .into_data()
            .to_vec()
            .expect("q-values are contiguous f32");
        Ok(select_greedy(&scores))
    }
}

/// Stacked-mode agent: consumes pre-stacked state tensors
///
/// For harnesses that maintain their own frame window. The agent holds no
/// frame history at all; every call is a pure function of its input and the
/// loaded weights.
pub struct StackedAgent<B: Backend> {
    /// Trained q-network
    network: DuelingQNetwork<B>,

    /// Agent configuration, matching the loaded checkpoint
    config: AgentConfig,
}

impl<B: Backend> StackedAgent<B> {
    /// Build an agent around an already-constructed network
    ///
    /// # Panics
    ///
    /// Panics if the configuration is invalid.
    pub fn new(network: DuelingQNetwork<B>, config: AgentConfig) -> Self {
        config.validate().expect("invalid agent configuration");
        Self { network, config }
    }

    /// Load a checkpoint and build an agent from it
    pub fn from_checkpoint(path: &Path, config: &AgentConfig, device: &B::Device) -> Result<Self> {
        let (network, _) = load_network_with_config::<B>(path, config, device)?;
        Ok(Self::new(network, config.clone()))
    }

    /// The loaded network (shared, read-only)
    pub fn network(&self) -> &DuelingQNetwork<B> {
        &self.network
    }

    /// The agent configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

impl<B: Backend> PolicyAgent for StackedAgent<B> {
    type Observation = Tensor<B, 3>;

    fn act(&mut self, observation: Tensor<B, 3>) -> Result<usize> {
        let dims = observation.dims();
        let expected = [
            self.config.frame_history,
            self.config.frame_size,
            self.config.frame_size,
        ];
        if dims != expected {
            bail!(
                "state tensor shape {:?} does not match expected {:?}",
                dims,
                expected
            );
        }

        let q_values = self.network.forward(observation.unsqueeze_dim(0));
        let scores: Vec<f32> = q_values
            .into_data()
            .to_vec()
            .expect("q-values are contiguous f32");
        Ok(select_greedy(&scores))
    }
}
