//! Backend type aliases and device management
//!
//! This module provides a convenient type alias for the Burn backend used at
//! inference time, plus a helper for device management.
//!
//! # Backend Selection
//!
//! The agent only ever runs a trained policy, so a plain NdArray CPU backend
//! without autodiff is all it needs. Every forward pass is a fixed-size
//! computation over one stacked 84x84 state, comfortably fast on CPU for
//! one decision per tick. GPU support (via the Wgpu backend) could be added
//! later if a harness batches many agents at once.
//!
//! # Example
//!
//! ```rust
//! use ml_platformer::rl::{default_device, InferenceBackend};
//!
//! let device = default_device();
//! // Use with network construction and checkpoint loading
//! ```

use burn::backend::ndarray::{NdArray, NdArrayDevice};

/// Backend type for running trained models
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
///
/// Returns the default NdArray device (CPU). This can be called multiple
/// times safely as it uses Burn's device management.
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}
