//! Screen perception for the platformer agent
//!
//! This module turns raw emulator frames into the temporal state tensor the
//! network consumes, without any game or rendering dependencies:
//! - Grayscale conversion and area downsampling to 84x84 (preprocess)
//! - A fixed-depth sliding window of recent frames (frame_stack)

pub mod frame_stack;
pub mod preprocess;

// Re-export commonly used types
pub use frame_stack::{FrameStack, FRAME_HISTORY};
pub use preprocess::{preprocess, GrayFrame, FRAME_SIZE};
