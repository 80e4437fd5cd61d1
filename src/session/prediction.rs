//! Shared prediction state, mutated by dispatch completions and reset.

use crate::defaults;
use std::sync::{Arc, Mutex};

/// Latest classification result, as shown to the user.
///
/// `confidence` is a display percentage, always clamped to [0, 100].
/// Sentinel labels (ready, connection error, model error) carry
/// confidence 0.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionState {
    pub label: String,
    pub confidence: f32,
}

impl PredictionState {
    fn sentinel(label: &str) -> Self {
        Self {
            label: label.to_string(),
            confidence: 0.0,
        }
    }

    /// State before the first frame has been processed.
    pub fn initializing() -> Self {
        Self::sentinel(defaults::LABEL_INITIALIZING)
    }

    /// The service is still accumulating frames.
    pub fn collecting() -> Self {
        Self::sentinel(defaults::LABEL_COLLECTING)
    }

    /// Neutral state set by the reset command.
    pub fn ready() -> Self {
        Self::sentinel(defaults::LABEL_READY)
    }

    /// The classification request could not reach the service.
    pub fn connection_error() -> Self {
        Self::sentinel(defaults::LABEL_CONNECTION_ERROR)
    }

    /// The service reported an explicit error payload.
    pub fn model_error() -> Self {
        Self::sentinel(defaults::LABEL_MODEL_ERROR)
    }

    /// The reset request itself failed.
    pub fn reset_failed() -> Self {
        Self::sentinel(defaults::LABEL_RESET_FAILED)
    }

    /// Build from a service verdict. The service reports confidence in
    /// [0, 1]; the displayed value is `round(confidence × 100)`, clamped.
    pub fn from_verdict(label: String, service_confidence: f32) -> Self {
        let confidence = (service_confidence.clamp(0.0, 1.0) * 100.0).round();
        Self { label, confidence }
    }
}

/// Prediction state shared between the dispatcher and presentation.
#[derive(Debug, Clone)]
pub struct SharedPrediction {
    inner: Arc<Mutex<PredictionState>>,
}

impl SharedPrediction {
    pub fn new(initial: PredictionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(initial)),
        }
    }

    /// Snapshot of the current prediction.
    pub fn get(&self) -> PredictionState {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn set(&self, state: PredictionState) {
        *self
            .inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = state;
    }
}
