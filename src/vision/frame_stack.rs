//! Sliding window of recent preprocessed frames
//!
//! A single frame cannot convey motion, so the network is fed the most
//! recent [`FRAME_HISTORY`] frames stacked along the channel dimension. The
//! stack is the only mutable state in the decision pipeline: it is owned by
//! exactly one agent and updated once per tick.

use std::collections::VecDeque;

use burn::tensor::{backend::Backend, Tensor, TensorData};

use super::preprocess::GrayFrame;

/// Number of consecutive frames stacked into one network input
pub const FRAME_HISTORY: usize = 4;

/// Fixed-depth ring of the most recent preprocessed frames, oldest first
///
/// Before the first push the stack is empty. The first push replicates its
/// frame into every slot, so the window reads as "no motion yet" instead of
/// being padded with blank frames. Every later push appends the new frame
/// and evicts the oldest, keeping the depth constant.
pub struct FrameStack {
    frames: VecDeque<GrayFrame>,
    depth: usize,
}

impl FrameStack {
    /// Create an empty stack holding up to `depth` frames
    pub fn new(depth: usize) -> Self {
        assert!(depth > 0, "frame stack depth must be at least 1");
        Self {
            frames: VecDeque::with_capacity(depth),
            depth,
        }
    }

    /// Push the newest frame, evicting the oldest once the stack is full
    ///
    /// On the very first push the frame is cloned into all `depth` slots.
    pub fn push(&mut self, frame: GrayFrame) {
        if self.frames.is_empty() {
            for _ in 1..self.depth {
                self.frames.push_back(frame.clone());
            }
        } else if self.frames.len() == self.depth {
            self.frames.pop_front();
        }
        self.frames.push_back(frame);
    }

    /// Drop all frames, returning to the pre-first-observation state
    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Number of frames currently held (0 or `depth`)
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// True until the first frame has been pushed
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Iterate over the held frames, oldest first
    pub fn frames(&self) -> impl Iterator<Item = &GrayFrame> {
        self.frames.iter()
    }

    /// Stack the window into a normalized state tensor
    ///
    /// Frames are stacked oldest first into shape `[depth, height, width]`
    /// and intensities are scaled from `0..=255` to `[0, 1]`.
    ///
    /// # Panics
    ///
    /// Panics if no frame has been pushed yet.
    pub fn to_state<B: Backend>(&self, device: &B::Device) -> Tensor<B, 3> {
        assert!(
            !self.frames.is_empty(),
            "state requested before the first observation"
        );

        let (width, height) = self.frames[0].dimensions();
        let mut data = Vec::with_capacity(self.depth * (width * height) as usize);
        for frame in &self.frames {
            data.extend(frame.as_raw().iter().map(|&v| f32::from(v) / 255.0));
        }

        Tensor::from_data(
            TensorData::new(data, [self.depth, height as usize, width as usize]),
            device,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vision::preprocess::FRAME_SIZE;
    use burn::backend::ndarray::{NdArray, NdArrayDevice};
    use image::Luma;

    type TestBackend = NdArray<f32>;

    fn constant_frame(value: u8) -> GrayFrame {
        GrayFrame::from_pixel(FRAME_SIZE, FRAME_SIZE, Luma([value]))
    }

    #[test]
    fn test_starts_empty() {
        let stack = FrameStack::new(FRAME_HISTORY);
        assert!(stack.is_empty());
        assert_eq!(stack.len(), 0);
    }

    #[test]
    fn test_first_push_fills_window() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        stack.push(constant_frame(10));

        assert_eq!(stack.len(), FRAME_HISTORY);
        for frame in stack.frames() {
            assert_eq!(frame.get_pixel(0, 0).0[0], 10);
        }
    }

    #[test]
    fn test_second_push_evicts_one_copy() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        stack.push(constant_frame(10));
        stack.push(constant_frame(20));

        // Window is [10, 10, 10, 20], oldest first
        let values: Vec<u8> = stack.frames().map(|f| f.get_pixel(0, 0).0[0]).collect();
        assert_eq!(values, vec![10, 10, 10, 20]);
    }

    #[test]
    fn test_steady_state_ordering() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        for value in [1, 2, 3, 4, 5, 6] {
            stack.push(constant_frame(value));
        }

        assert_eq!(stack.len(), FRAME_HISTORY);
        let values: Vec<u8> = stack.frames().map(|f| f.get_pixel(0, 0).0[0]).collect();
        assert_eq!(values, vec![3, 4, 5, 6]);
    }

    #[test]
    fn test_clear_returns_to_cold_start() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        stack.push(constant_frame(10));
        stack.clear();
        assert!(stack.is_empty());

        stack.push(constant_frame(30));
        let values: Vec<u8> = stack.frames().map(|f| f.get_pixel(0, 0).0[0]).collect();
        assert_eq!(values, vec![30, 30, 30, 30]);
    }

    #[test]
    fn test_state_tensor_shape_and_range() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        stack.push(constant_frame(255));

        let device = NdArrayDevice::default();
        let state = stack.to_state::<TestBackend>(&device);

        assert_eq!(
            state.dims(),
            [FRAME_HISTORY, FRAME_SIZE as usize, FRAME_SIZE as usize]
        );

        let data = state.into_data();
        for &value in data.as_slice::<f32>().unwrap() {
            assert!((0.0..=1.0).contains(&value));
            assert_eq!(value, 1.0);
        }
    }

    #[test]
    fn test_state_tensor_normalization_and_order() {
        let mut stack = FrameStack::new(FRAME_HISTORY);
        for value in [0, 51, 102, 255] {
            stack.push(constant_frame(value));
        }

        let device = NdArrayDevice::default();
        let state = stack.to_state::<TestBackend>(&device);
        let data = state.into_data();
        let values = data.as_slice::<f32>().unwrap();

        let frame_len = (FRAME_SIZE * FRAME_SIZE) as usize;
        assert_eq!(values[0], 0.0);
        assert_eq!(values[frame_len], 0.2);
        assert_eq!(values[2 * frame_len], 0.4);
        assert_eq!(values[3 * frame_len], 1.0);
    }

    #[test]
    #[should_panic(expected = "before the first observation")]
    fn test_state_before_first_push_panics() {
        let stack = FrameStack::new(FRAME_HISTORY);
        let device = NdArrayDevice::default();
        let _ = stack.to_state::<TestBackend>(&device);
    }
}
