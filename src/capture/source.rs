use crate::defaults;
use crate::error::{Result, WeSignError};
use std::time::Instant;

/// A single decoded RGB frame from the capture device.
///
/// `pixels` is tightly packed RGB8, `width * height * 3` bytes.
#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
    /// Timestamp when this frame was captured.
    pub timestamp: Instant,
    /// Sequence number for ordering and gap detection.
    pub sequence: u64,
}

impl VideoFrame {
    /// Creates a new frame. `pixels` length must match the geometry.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>, sequence: u64) -> Result<Self> {
        let expected = (width as usize) * (height as usize) * 3;
        if pixels.len() != expected {
            return Err(WeSignError::CaptureFailed {
                message: format!(
                    "frame buffer size mismatch: expected {expected} bytes, got {}",
                    pixels.len()
                ),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
            timestamp: Instant::now(),
            sequence,
        })
    }
}

/// Trait for frame capture devices.
///
/// This trait allows swapping implementations (real camera adapter vs mock).
/// Real cameras are platform services behind an adapter implementing this
/// trait; the core only depends on the interface.
pub trait FrameSource: Send {
    /// Acquire the capture device and begin frame emission.
    fn start(&mut self) -> Result<()>;

    /// Release the capture device. Must be safe to call more than once.
    fn stop(&mut self) -> Result<()>;

    /// Read the most recent decoded frame, if a new one is available.
    ///
    /// Returns `Ok(None)` when no new frame has arrived since the last
    /// read; callers poll at the configured frame cadence.
    fn read_frame(&mut self) -> Result<Option<VideoFrame>>;
}

/// Configuration for frame source initialization
#[derive(Debug, Clone)]
pub struct FrameSourceConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

impl Default for FrameSourceConfig {
    fn default() -> Self {
        Self {
            width: defaults::FRAME_WIDTH,
            height: defaults::FRAME_HEIGHT,
            frame_rate: defaults::FRAME_RATE,
        }
    }
}

/// Mock frame source for testing
#[derive(Debug, Clone)]
pub struct MockFrameSource {
    is_started: bool,
    width: u32,
    height: u32,
    sequence: u64,
    max_frames: Option<u64>,
    should_fail_start: bool,
    should_fail_stop: bool,
    should_fail_read: bool,
    error_message: String,
}

impl MockFrameSource {
    /// Create a new mock frame source with default settings
    pub fn new() -> Self {
        Self {
            is_started: false,
            width: 8,
            height: 8,
            sequence: 0,
            max_frames: None,
            should_fail_start: false,
            should_fail_stop: false,
            should_fail_read: false,
            error_message: "mock capture error".to_string(),
        }
    }

    /// Configure the frame geometry
    pub fn with_geometry(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Configure the mock to stop producing frames after `count` reads
    pub fn with_frame_limit(mut self, count: u64) -> Self {
        self.max_frames = Some(count);
        self
    }

    /// Configure the mock to fail on start
    pub fn with_start_failure(mut self) -> Self {
        self.should_fail_start = true;
        self
    }

    /// Configure the mock to fail on stop
    pub fn with_stop_failure(mut self) -> Self {
        self.should_fail_stop = true;
        self
    }

    /// Configure the mock to fail on read
    pub fn with_read_failure(mut self) -> Self {
        self.should_fail_read = true;
        self
    }

    /// Configure the error message for failures
    pub fn with_error_message(mut self, message: &str) -> Self {
        self.error_message = message.to_string();
        self
    }

    /// Check if the frame source is started
    pub fn is_started(&self) -> bool {
        self.is_started
    }
}

impl Default for MockFrameSource {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameSource for MockFrameSource {
    fn start(&mut self) -> Result<()> {
        if self.should_fail_start {
            Err(WeSignError::CaptureUnavailable {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = true;
            Ok(())
        }
    }

    fn stop(&mut self) -> Result<()> {
        if self.should_fail_stop {
            Err(WeSignError::CaptureFailed {
                message: self.error_message.clone(),
            })
        } else {
            self.is_started = false;
            Ok(())
        }
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>> {
        if self.should_fail_read {
            return Err(WeSignError::CaptureFailed {
                message: self.error_message.clone(),
            });
        }
        if let Some(max) = self.max_frames
            && self.sequence >= max
        {
            return Ok(None);
        }
        let pixels = vec![0u8; (self.width * self.height * 3) as usize];
        let frame = VideoFrame::new(self.width, self.height, pixels, self.sequence)?;
        self.sequence += 1;
        Ok(Some(frame))
    }
}

/// Deterministic synthetic frame source.
///
/// Produces a horizontal gradient with a moving vertical bar keyed to the
/// sequence number. Used as a diagnostic source when no camera adapter is
/// wired in, and by tests that need real pixel content.
#[derive(Debug, Clone)]
pub struct TestPatternSource {
    config: FrameSourceConfig,
    is_started: bool,
    sequence: u64,
}

impl TestPatternSource {
    pub fn new(config: FrameSourceConfig) -> Self {
        Self {
            config,
            is_started: false,
            sequence: 0,
        }
    }
}

impl FrameSource for TestPatternSource {
    fn start(&mut self) -> Result<()> {
        self.is_started = true;
        Ok(())
    }

    fn stop(&mut self) -> Result<()> {
        self.is_started = false;
        Ok(())
    }

    fn read_frame(&mut self) -> Result<Option<VideoFrame>> {
        if !self.is_started {
            return Ok(None);
        }
        let (w, h) = (self.config.width, self.config.height);
        let bar = (self.sequence % w as u64) as u32;
        let mut pixels = Vec::with_capacity((w * h * 3) as usize);
        for _y in 0..h {
            for x in 0..w {
                if x == bar {
                    pixels.extend_from_slice(&[0xFF, 0xFF, 0xFF]);
                } else {
                    let shade = (x * 255 / w.max(1)) as u8;
                    pixels.extend_from_slice(&[shade, shade / 2, 0x20]);
                }
            }
        }
        let frame = VideoFrame::new(w, h, pixels, self.sequence)?;
        self.sequence += 1;
        Ok(Some(frame))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_frame_rejects_size_mismatch() {
        let result = VideoFrame::new(4, 4, vec![0u8; 10], 0);
        assert!(matches!(
            result,
            Err(WeSignError::CaptureFailed { .. })
        ));
    }

    #[test]
    fn test_video_frame_accepts_matching_buffer() {
        let frame = VideoFrame::new(4, 4, vec![0u8; 48], 7).unwrap();
        assert_eq!(frame.width, 4);
        assert_eq!(frame.height, 4);
        assert_eq!(frame.sequence, 7);
    }

    #[test]
    fn test_mock_source_start_stop_state_management() {
        let mut source = MockFrameSource::new();

        assert!(!source.is_started());
        assert!(source.start().is_ok());
        assert!(source.is_started());
        assert!(source.stop().is_ok());
        assert!(!source.is_started());
    }

    #[test]
    fn test_mock_source_start_failure_maps_to_capture_unavailable() {
        let mut source = MockFrameSource::new()
            .with_start_failure()
            .with_error_message("camera permission denied");

        let result = source.start();
        assert!(!source.is_started());
        match result {
            Err(WeSignError::CaptureUnavailable { message }) => {
                assert_eq!(message, "camera permission denied");
            }
            _ => panic!("Expected CaptureUnavailable error"),
        }
    }

    #[test]
    fn test_mock_source_read_failure() {
        let mut source = MockFrameSource::new().with_read_failure();

        match source.read_frame() {
            Err(WeSignError::CaptureFailed { message }) => {
                assert_eq!(message, "mock capture error");
            }
            _ => panic!("Expected CaptureFailed error"),
        }
    }

    #[test]
    fn test_mock_source_sequence_increments() {
        let mut source = MockFrameSource::new();
        let first = source.read_frame().unwrap().unwrap();
        let second = source.read_frame().unwrap().unwrap();
        assert_eq!(first.sequence, 0);
        assert_eq!(second.sequence, 1);
    }

    #[test]
    fn test_mock_source_frame_limit_exhausts() {
        let mut source = MockFrameSource::new().with_frame_limit(2);
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.read_frame().unwrap().is_none());
        assert!(source.read_frame().unwrap().is_none());
    }

    #[test]
    fn test_mock_source_stop_is_repeatable() {
        let mut source = MockFrameSource::new();
        source.start().unwrap();
        assert!(source.stop().is_ok());
        assert!(source.stop().is_ok());
    }

    #[test]
    fn test_frame_source_trait_is_object_safe() {
        let mut source: Box<dyn FrameSource> = Box::new(MockFrameSource::new());
        assert!(source.start().is_ok());
        assert!(source.read_frame().unwrap().is_some());
        assert!(source.stop().is_ok());
    }

    #[test]
    fn test_frame_source_config_default() {
        let config = FrameSourceConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.frame_rate, 30);
    }

    #[test]
    fn test_pattern_source_idle_until_started() {
        let mut source = TestPatternSource::new(FrameSourceConfig {
            width: 16,
            height: 8,
            frame_rate: 30,
        });
        assert!(source.read_frame().unwrap().is_none());

        source.start().unwrap();
        let frame = source.read_frame().unwrap().unwrap();
        assert_eq!(frame.pixels.len(), 16 * 8 * 3);
    }

    #[test]
    fn test_pattern_source_is_deterministic_per_sequence() {
        let config = FrameSourceConfig {
            width: 16,
            height: 8,
            frame_rate: 30,
        };
        let mut a = TestPatternSource::new(config.clone());
        let mut b = TestPatternSource::new(config);
        a.start().unwrap();
        b.start().unwrap();

        let fa = a.read_frame().unwrap().unwrap();
        let fb = b.read_frame().unwrap().unwrap();
        assert_eq!(fa.pixels, fb.pixels);

        // Bar moves with the sequence, so consecutive frames differ
        let fa2 = a.read_frame().unwrap().unwrap();
        assert_ne!(fa.pixels, fa2.pixels);
    }
}
