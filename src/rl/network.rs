//! Dueling Q-network for frame-stack observations
//!
//! This module implements the action-value network: a convolutional trunk
//! over stacked grayscale frames followed by a dueling head split:
//! - **Value head**: Outputs a scalar estimate of the state's value
//! - **Advantage head**: Outputs one advantage entry per discrete action
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 4, 84, 84]
//!   ↓ Conv2d(4→32, k=8, s=4) + ReLU      → [batch, 32, 20, 20]
//!   ↓ Conv2d(32→64, k=4, s=2) + ReLU     → [batch, 64, 9, 9]
//!   ↓ Conv2d(64→64, k=3, s=1) + ReLU     → [batch, 64, 7, 7]
//!   ↓ Flatten: [batch, 3136]
//!   ↓ Linear(3136 → 512) + ReLU
//!   ↓ Split
//!   ├─→ Value: Linear(512 → 1)           → V(s)
//!   └─→ Advantage: Linear(512 → N)       → A(s, a)
//! ```
//!
//! The two streams recombine as `Q(s, a) = V(s) + A(s, a) - mean(A)`.
//! Subtracting the mean advantage pins down which part of the estimate is
//! state value and which is per-action advantage; a checkpoint trained under
//! this rule only reproduces its behavior if inference applies it too.
//!
//! The forward pass is a pure function of the input and the loaded weights:
//! single-precision arithmetic, no dropout, no sampling.
//!
//! # Example
//!
//! ```rust
//! use ml_platformer::rl::DuelingQNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let config = DuelingQNetworkConfig::new(12);
//! let network = config.init::<Backend>(&device);
//!
//! let state = Tensor::zeros([1, 4, 84, 84], &device);
//! let q_values = network.forward(state);
//!
//! assert_eq!(q_values.dims(), [1, 12]); // [batch, action_count]
//! ```

use burn::{
    module::Module,
    nn::{
        conv::{Conv2d, Conv2dConfig},
        Linear, LinearConfig, PaddingConfig2d,
    },
    tensor::{activation::relu, backend::Backend, Tensor},
};

// Kernel size and stride of each trunk stage
const CONV_KERNELS: [usize; 3] = [8, 4, 3];
const CONV_STRIDES: [usize; 3] = [4, 2, 1];

/// Configuration for the dueling Q-network
#[derive(Debug, Clone)]
pub struct DuelingQNetworkConfig {
    /// Number of stacked input frames (default: 4)
    pub input_frames: usize,

    /// Number of discrete actions scored by the advantage head
    pub action_count: usize,

    /// Number of channels for each convolutional layer (default: [32, 64, 64])
    pub conv_channels: [usize; 3],

    /// Hidden dimension of the fully connected layer (default: 512)
    pub hidden_dim: usize,

    /// Side length of each input frame in pixels (default: 84)
    pub frame_size: usize,
}

impl DuelingQNetworkConfig {
    /// Create a new configuration with the reference hyperparameters
    pub fn new(action_count: usize) -> Self {
        Self {
            input_frames: 4,
            action_count,
            conv_channels: [32, 64, 64],
            hidden_dim: 512,
            frame_size: 84,
        }
    }

    /// Initialize the network from this configuration
    ///
    /// # Arguments
    ///
    /// * `device` - The device to place the network on
    pub fn init<B: Backend>(&self, device: &B::Device) -> DuelingQNetwork<B> {
        let feature_side = trunk_output_size(self.frame_size);
        assert!(
            feature_side > 0,
            "frame_size {} is too small for the convolutional trunk",
            self.frame_size
        );
        let flattened_dim = self.conv_channels[2] * feature_side * feature_side;

        DuelingQNetwork {
            conv1: Conv2dConfig::new(
                [self.input_frames, self.conv_channels[0]],
                [CONV_KERNELS[0]; 2],
            )
            .with_stride([CONV_STRIDES[0]; 2])
            .with_padding(PaddingConfig2d::Valid)
            .init(device),
            conv2: Conv2dConfig::new(
                [self.conv_channels[0], self.conv_channels[1]],
                [CONV_KERNELS[1]; 2],
            )
            .with_stride([CONV_STRIDES[1]; 2])
            .with_padding(PaddingConfig2d::Valid)
            .init(device),
            conv3: Conv2dConfig::new(
                [self.conv_channels[1], self.conv_channels[2]],
                [CONV_KERNELS[2]; 2],
            )
            .with_stride([CONV_STRIDES[2]; 2])
            .with_padding(PaddingConfig2d::Valid)
            .init(device),
            fc: LinearConfig::new(flattened_dim, self.hidden_dim).init(device),
            value_head: LinearConfig::new(self.hidden_dim, 1).init(device),
            advantage_head: LinearConfig::new(self.hidden_dim, self.action_count).init(device),
        }
    }
}

impl Default for DuelingQNetworkConfig {
    fn default() -> Self {
        Self::new(12)
    }
}

/// Spatial side length of the trunk output for a square input
///
/// Applies the unpadded kernel/stride chain of the three stages.
fn trunk_output_size(frame_size: usize) -> usize {
    let mut size = frame_size;
    for (kernel, stride) in CONV_KERNELS.into_iter().zip(CONV_STRIDES) {
        if size < kernel {
            return 0;
        }
        size = (size - kernel) / stride + 1;
    }
    size
}

/// Dueling action-value network
///
/// Maps a stacked-frame state tensor to one score per discrete action. The
/// network holds no mutable state; given fixed weights, `forward` is
/// deterministic and may be called from any number of ticks in sequence.
///
/// # Type Parameters
///
/// * `B` - The Burn backend to use (e.g., `NdArray<f32>`)
#[derive(Module, Debug)]
pub struct DuelingQNetwork<B: Backend> {
    /// First convolutional layer: frames → 32 channels, kernel 8, stride 4
    conv1: Conv2d<B>,
    /// Second convolutional layer: 32 → 64 channels, kernel 4, stride 2
    conv2: Conv2d<B>,
    /// Third convolutional layer: 64 → 64 channels, kernel 3, stride 1
    conv3: Conv2d<B>,
    /// Fully connected layer after flattening
    fc: Linear<B>,
    /// Value head: scalar state value
    value_head: Linear<B>,
    /// Advantage head: one entry per action
    advantage_head: Linear<B>,
}

impl<B: Backend> DuelingQNetwork<B> {
    /// Forward pass producing q-values
    ///
    /// # Arguments
    ///
    /// * `state` - Tensor with shape `[batch, frames, height, width]`,
    ///   values in `[0, 1]`
    ///
    /// # Returns
    ///
    /// Tensor with shape `[batch, action_count]` holding
    /// `Q(s, a) = V(s) + A(s, a) - mean(A)` for each action.
    pub fn forward(&self, state: Tensor<B, 4>) -> Tensor<B, 2> {
        let (value, advantage) = self.forward_decomposed(state);

        // Mean over the action dimension, kept as [batch, 1] so both the
        // subtraction and the value addition broadcast per row
        let advantage_mean = advantage.clone().mean_dim(1);
        advantage.sub(advantage_mean).add(value)
    }

    /// Forward pass returning the two head outputs before combination
    ///
    /// # Returns
    ///
    /// A tuple of:
    /// - `value`: Tensor with shape `[batch, 1]` - state value V(s)
    /// - `advantage`: Tensor with shape `[batch, action_count]` - per-action
    ///   advantages A(s, a)
    pub fn forward_decomposed(&self, state: Tensor<B, 4>) -> (Tensor<B, 2>, Tensor<B, 2>) {
        // Convolutional trunk with ReLU activations
        let x = relu(self.conv1.forward(state));
        let x = relu(self.conv2.forward(x));
        let x = relu(self.conv3.forward(x));

        // Flatten: [batch, C, H, W] → [batch, C*H*W]
        let [batch_size, channels, height, width] = x.dims();
        let x = x.reshape([batch_size, channels * height * width]);

        let x = relu(self.fc.forward(x));

        let value = self.value_head.forward(x.clone());
        let advantage = self.advantage_head.forward(x);

        (value, advantage)
    }
}
