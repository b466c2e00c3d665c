//! Policy inference for the platformer agent
//!
//! Provides:
//! - Dueling q-network over stacked frame observations
//! - Greedy action selection
//! - Frame-mode and stacked-mode agents behind one capability trait
//! - Checkpoint persistence and validation
//! - Backend alias and device management for CPU inference

pub mod action;
pub mod agent;
pub mod backend;
pub mod config;
pub mod network;
pub mod persistence;

pub use action::select_greedy;
pub use agent::{FrameAgent, PolicyAgent, StackedAgent};
pub use backend::{default_device, InferenceBackend};
pub use config::AgentConfig;
pub use network::{DuelingQNetwork, DuelingQNetworkConfig};
pub use persistence::{load_network, load_network_with_config, save_network, ModelMetadata};
