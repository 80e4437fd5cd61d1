//! Remote sign classification capability.

pub mod http;

pub use http::HttpClassifier;

use crate::error::{Result, WeSignError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Outcome of one classification request.
#[derive(Debug, Clone, PartialEq)]
pub enum ClassifierVerdict {
    /// The service produced a prediction. Confidence is the raw service
    /// value in [0, 1].
    Prediction { label: String, confidence: f32 },
    /// The service responded with an explicit error payload.
    ServiceError(String),
    /// The service is still accumulating frames and has nothing to say yet.
    Collecting,
}

/// Trait for the remote classification service.
///
/// This trait allows swapping implementations (HTTP service vs mock).
#[async_trait]
pub trait SignClassifier: Send + Sync {
    /// Submit one compressed frame for classification.
    ///
    /// Transport failures surface as `Err`; service-reported errors come
    /// back as `Ok(ClassifierVerdict::ServiceError)`.
    async fn predict(&self, jpeg: &[u8]) -> Result<ClassifierVerdict>;

    /// Ask the service to clear any server-side accumulation state.
    async fn reset(&self) -> Result<()>;
}

/// Mock classifier for testing
pub struct MockClassifier {
    verdicts: Mutex<VecDeque<ClassifierVerdict>>,
    fallback: ClassifierVerdict,
    latency: Option<Duration>,
    fail_transport: bool,
    fail_reset: bool,
    predict_calls: AtomicUsize,
    reset_calls: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl MockClassifier {
    /// Create a mock that always reports "collecting"
    pub fn new() -> Self {
        Self {
            verdicts: Mutex::new(VecDeque::new()),
            fallback: ClassifierVerdict::Collecting,
            latency: None,
            fail_transport: false,
            fail_reset: false,
            predict_calls: AtomicUsize::new(0),
            reset_calls: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Configure the verdict returned once the scripted queue is empty
    pub fn with_fallback(mut self, verdict: ClassifierVerdict) -> Self {
        self.fallback = verdict;
        self
    }

    /// Queue a scripted verdict, consumed in order
    pub fn with_scripted(self, verdict: ClassifierVerdict) -> Self {
        self.verdicts
            .lock()
            .expect("verdict queue poisoned")
            .push_back(verdict);
        self
    }

    /// Configure an artificial request latency
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Configure predict to fail at the transport level
    pub fn with_transport_failure(mut self) -> Self {
        self.fail_transport = true;
        self
    }

    /// Configure reset to fail at the transport level
    pub fn with_reset_failure(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    /// Number of predict calls so far
    pub fn predict_calls(&self) -> usize {
        self.predict_calls.load(Ordering::SeqCst)
    }

    /// Number of reset calls so far
    pub fn reset_calls(&self) -> usize {
        self.reset_calls.load(Ordering::SeqCst)
    }

    /// High-water mark of concurrently outstanding predict calls.
    ///
    /// The single-flight invariant holds iff this never exceeds 1.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SignClassifier for MockClassifier {
    async fn predict(&self, _jpeg: &[u8]) -> Result<ClassifierVerdict> {
        self.predict_calls.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        if self.fail_transport {
            return Err(WeSignError::Transport {
                message: "mock transport failure".to_string(),
            });
        }

        let scripted = self
            .verdicts
            .lock()
            .expect("verdict queue poisoned")
            .pop_front();
        Ok(scripted.unwrap_or_else(|| self.fallback.clone()))
    }

    async fn reset(&self) -> Result<()> {
        self.reset_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_reset {
            Err(WeSignError::Transport {
                message: "mock reset failure".to_string(),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_classifier_default_is_collecting() {
        let classifier = MockClassifier::new();
        let verdict = classifier.predict(b"jpeg").await.unwrap();
        assert_eq!(verdict, ClassifierVerdict::Collecting);
        assert_eq!(classifier.predict_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_classifier_scripted_then_fallback() {
        let classifier = MockClassifier::new()
            .with_scripted(ClassifierVerdict::Prediction {
                label: "kamusta".to_string(),
                confidence: 0.9,
            })
            .with_fallback(ClassifierVerdict::ServiceError("drained".to_string()));

        assert_eq!(
            classifier.predict(b"x").await.unwrap(),
            ClassifierVerdict::Prediction {
                label: "kamusta".to_string(),
                confidence: 0.9,
            }
        );
        assert_eq!(
            classifier.predict(b"x").await.unwrap(),
            ClassifierVerdict::ServiceError("drained".to_string())
        );
    }

    #[tokio::test]
    async fn test_mock_classifier_transport_failure() {
        let classifier = MockClassifier::new().with_transport_failure();
        match classifier.predict(b"x").await {
            Err(WeSignError::Transport { message }) => {
                assert_eq!(message, "mock transport failure");
            }
            _ => panic!("Expected Transport error"),
        }
    }

    #[tokio::test]
    async fn test_mock_classifier_reset_counts_and_failure() {
        let ok = MockClassifier::new();
        ok.reset().await.unwrap();
        assert_eq!(ok.reset_calls(), 1);

        let failing = MockClassifier::new().with_reset_failure();
        assert!(failing.reset().await.is_err());
        assert_eq!(failing.reset_calls(), 1);
    }

    #[tokio::test]
    async fn test_mock_classifier_tracks_concurrency_high_water() {
        use std::sync::Arc;

        let classifier = Arc::new(MockClassifier::new().with_latency(Duration::from_millis(50)));

        let a = tokio::spawn({
            let c = Arc::clone(&classifier);
            async move { c.predict(b"x").await }
        });
        let b = tokio::spawn({
            let c = Arc::clone(&classifier);
            async move { c.predict(b"x").await }
        });
        let _ = a.await.unwrap();
        let _ = b.await.unwrap();

        assert_eq!(classifier.max_in_flight(), 2);
    }
}
