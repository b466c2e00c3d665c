//! ML Platformer - deployment-time inference agent for a side-scrolling
//! platformer
//!
//! This library provides the full perception-to-action pipeline for running
//! a pretrained dueling DQN policy, one decision per game tick:
//! - Frame preprocessing and the sliding frame window (vision module)
//! - The q-network, action selection, agents, and checkpoint loading
//!   (rl module)
//!
//! Training, reward shaping, and the game loop itself live outside this
//! crate; it consumes observations and produces discrete action indices.

pub mod rl;
pub mod vision;
