use crate::capture::VideoFrame;
use crate::error::{Result, WeSignError};
use crate::landmarks::{HAND_LANDMARK_COUNT, Landmark, LandmarkSets, POSE_LANDMARK_COUNT};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Trait for the landmark extraction capability.
///
/// This trait allows swapping implementations (platform tracker vs mock).
/// Successive yields carry no ordering guarantee relative to capture
/// frames; callers must gate every yield on the session liveness flag
/// before mutating shared state.
#[async_trait]
pub trait LandmarkAnnotator: Send + Sync {
    /// Derive landmark sets for one frame.
    ///
    /// Each returned field is independently optional; a part absent from
    /// the frame simply yields `None` for that field.
    async fn process(&self, frame: &VideoFrame) -> Result<LandmarkSets>;

    /// Check if the annotator is ready. Sessions refuse to start over an
    /// annotator that reports not ready.
    fn is_ready(&self) -> bool;
}

/// Annotator that detects nothing.
///
/// Stands in when no platform tracker adapter is wired up: frames reach
/// the classification service without skeleton overlays.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullAnnotator;

#[async_trait]
impl LandmarkAnnotator for NullAnnotator {
    async fn process(&self, _frame: &VideoFrame) -> Result<LandmarkSets> {
        Ok(LandmarkSets::default())
    }

    fn is_ready(&self) -> bool {
        true
    }
}

/// Mock annotator for testing
#[derive(Debug, Clone)]
pub struct MockAnnotator {
    sets: LandmarkSets,
    delay: Option<Duration>,
    should_fail: bool,
    processed: Arc<AtomicU64>,
}

impl MockAnnotator {
    /// Create a new mock annotator that detects nothing
    pub fn new() -> Self {
        Self {
            sets: LandmarkSets::default(),
            delay: None,
            should_fail: false,
            processed: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Configure the mock to return specific landmark sets
    pub fn with_sets(mut self, sets: LandmarkSets) -> Self {
        self.sets = sets;
        self
    }

    /// Configure the mock to return a full synthetic detection
    /// (pose + both hands + face), with every point at the frame center.
    pub fn with_full_detection(mut self) -> Self {
        let center = Landmark::new(0.5, 0.5, 0.0);
        self.sets = LandmarkSets {
            pose: Some(vec![center; POSE_LANDMARK_COUNT]),
            left_hand: Some(vec![center; HAND_LANDMARK_COUNT]),
            right_hand: Some(vec![center; HAND_LANDMARK_COUNT]),
            face: Some(vec![center; 468]),
        };
        self
    }

    /// Configure an artificial processing delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Configure the mock to fail on process
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of frames processed so far
    pub fn processed_count(&self) -> u64 {
        self.processed.load(Ordering::SeqCst)
    }
}

impl Default for MockAnnotator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LandmarkAnnotator for MockAnnotator {
    async fn process(&self, _frame: &VideoFrame) -> Result<LandmarkSets> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.processed.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            Err(WeSignError::Annotation {
                message: "mock annotation failure".to_string(),
            })
        } else {
            Ok(self.sets.clone())
        }
    }

    fn is_ready(&self) -> bool {
        !self.should_fail
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_frame() -> VideoFrame {
        VideoFrame::new(4, 4, vec![0u8; 48], 0).unwrap()
    }

    #[tokio::test]
    async fn test_mock_annotator_returns_configured_sets() {
        let annotator = MockAnnotator::new().with_full_detection();

        let sets = annotator.process(&test_frame()).await.unwrap();

        assert!(sets.pose.is_some());
        assert!(sets.left_hand.is_some());
        assert!(sets.right_hand.is_some());
        assert!(sets.face.is_some());
        assert_eq!(sets.pose.unwrap().len(), POSE_LANDMARK_COUNT);
    }

    #[tokio::test]
    async fn test_mock_annotator_default_detects_nothing() {
        let annotator = MockAnnotator::new();
        let sets = annotator.process(&test_frame()).await.unwrap();
        assert!(sets.is_empty());
    }

    #[tokio::test]
    async fn test_mock_annotator_failure() {
        let annotator = MockAnnotator::new().with_failure();
        assert!(!annotator.is_ready());

        match annotator.process(&test_frame()).await {
            Err(WeSignError::Annotation { message }) => {
                assert_eq!(message, "mock annotation failure");
            }
            _ => panic!("Expected Annotation error"),
        }
    }

    #[tokio::test]
    async fn test_mock_annotator_counts_processed_frames() {
        let annotator = MockAnnotator::new();
        assert_eq!(annotator.processed_count(), 0);

        annotator.process(&test_frame()).await.unwrap();
        annotator.process(&test_frame()).await.unwrap();
        assert_eq!(annotator.processed_count(), 2);
    }

    #[tokio::test]
    async fn test_null_annotator_is_ready_and_detects_nothing() {
        let annotator = NullAnnotator;
        assert!(annotator.is_ready());
        let sets = annotator.process(&test_frame()).await.unwrap();
        assert!(sets.is_empty());
    }

    #[tokio::test]
    async fn test_annotator_trait_is_object_safe() {
        let annotator: Arc<dyn LandmarkAnnotator> = Arc::new(MockAnnotator::new());
        assert!(annotator.is_ready());
        let sets = annotator.process(&test_frame()).await.unwrap();
        assert!(sets.is_empty());
    }
}
