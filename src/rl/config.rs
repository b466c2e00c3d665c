//! Agent configuration
//!
//! The fixed parameters a deployed agent is built with. These must match the
//! checkpoint the agent loads: the action count fixes the advantage head
//! width, and the frame geometry fixes the convolutional trunk input.

use serde::{Deserialize, Serialize};

use crate::vision::{FRAME_HISTORY, FRAME_SIZE};

/// Configuration for a deployed agent
///
/// The defaults describe the reference setup: 12 discrete actions over a
/// window of 4 stacked 84x84 frames.
///
/// # Example
///
/// ```rust
/// use ml_platformer::rl::AgentConfig;
///
/// // Reference configuration
/// let config = AgentConfig::default();
/// assert_eq!(config.action_count, 12);
///
/// // Or a different action space
/// let config = AgentConfig::new(7);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Number of discrete actions the policy chooses between
    ///
    /// Must match the action space the checkpoint was trained against.
    ///
    /// Default: 12
    pub action_count: usize,

    /// Number of consecutive frames stacked into one network input
    ///
    /// Default: 4
    pub frame_history: usize,

    /// Side length of a preprocessed frame, in pixels
    ///
    /// Default: 84
    pub frame_size: usize,
}

impl AgentConfig {
    /// Create a configuration for a given action space, keeping the
    /// reference frame geometry
    pub fn new(action_count: usize) -> Self {
        Self {
            action_count,
            ..Default::default()
        }
    }

    /// Validate configuration parameters
    ///
    /// # Returns
    ///
    /// `Ok(())` if all parameters are valid, `Err(String)` with an error
    /// message otherwise.
    ///
    /// # Example
    ///
    /// ```rust
    /// use ml_platformer::rl::AgentConfig;
    ///
    /// let mut config = AgentConfig::default();
    /// assert!(config.validate().is_ok());
    ///
    /// config.action_count = 0;
    /// assert!(config.validate().is_err());
    /// ```
    pub fn validate(&self) -> Result<(), String> {
        if self.action_count == 0 {
            return Err("action_count must be at least 1".to_string());
        }

        if self.frame_history == 0 {
            return Err("frame_history must be at least 1".to_string());
        }

        // The convolutional trunk (kernels 8/4/3, strides 4/2/1, no padding)
        // needs at least a 36-pixel frame to produce a non-empty feature map.
        if self.frame_size < 36 {
            return Err(format!(
                "frame_size must be at least 36, got {}",
                self.frame_size
            ));
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            action_count: 12,
            frame_history: FRAME_HISTORY,
            frame_size: FRAME_SIZE as usize,
        }
    }
}
