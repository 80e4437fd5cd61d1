//! Capture device lifecycle and frame emission.

pub mod source;

pub use source::{FrameSource, FrameSourceConfig, MockFrameSource, TestPatternSource, VideoFrame};
