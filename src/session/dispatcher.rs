//! Inference dispatch: periodic snapshot, encode, classify.
//!
//! One request in flight at a time. A tick that fires while a request is
//! outstanding is dropped, never queued, so a slow service thins the
//! request rate instead of building a backlog.

use crate::classify::{ClassifierVerdict, SignClassifier};
use crate::overlay::DrawSurface;
use crate::session::prediction::{PredictionState, SharedPrediction};
use crate::session::{SessionEvent, emit};
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::MissedTickBehavior;

/// Single-flight gate for classification requests.
///
/// Acquired with a compare-and-swap at tick time, released by the guard's
/// `Drop` so every completion path, including a late one after the session
/// stopped, returns the gate exactly once.
#[derive(Debug, Default)]
pub(crate) struct DispatchLock {
    held: AtomicBool,
}

impl DispatchLock {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Take the gate if it is free.
    pub(crate) fn try_acquire(lock: &Arc<Self>) -> Option<DispatchGuard> {
        lock.held
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| DispatchGuard {
                lock: Arc::clone(lock),
            })
    }

    #[cfg(test)]
    pub(crate) fn is_held(&self) -> bool {
        self.held.load(Ordering::SeqCst)
    }
}

pub(crate) struct DispatchGuard {
    lock: Arc<DispatchLock>,
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        self.lock.held.store(false, Ordering::SeqCst);
    }
}

/// Everything the dispatch loop needs, bundled for the spawned task.
pub(crate) struct DispatchContext {
    pub liveness: Arc<AtomicBool>,
    pub surface: Arc<Mutex<DrawSurface>>,
    pub classifier: Arc<dyn SignClassifier>,
    pub prediction: SharedPrediction,
    pub lock: Arc<DispatchLock>,
    pub interval: Duration,
    pub jpeg_quality: u8,
    pub event_tx: Option<Sender<SessionEvent>>,
    pub quiet: bool,
}

impl DispatchContext {
    /// Dispatch loop body. Runs until the liveness flag clears.
    pub(crate) async fn run(self) {
        let mut ticker = tokio::time::interval(self.interval.max(Duration::from_millis(1)));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            ticker.tick().await;
            if !self.liveness.load(Ordering::SeqCst) {
                break;
            }

            // A request is still in flight; this tick is dropped.
            let Some(guard) = DispatchLock::try_acquire(&self.lock) else {
                continue;
            };

            let jpeg = {
                let surface = self
                    .surface
                    .lock()
                    .unwrap_or_else(|poisoned| poisoned.into_inner());
                surface.to_jpeg(self.jpeg_quality)
            };
            let jpeg = match jpeg {
                Ok(bytes) => bytes,
                Err(e) => {
                    drop(guard);
                    if !self.quiet {
                        eprintln!("wesign: frame encode failed: {e}");
                    }
                    continue;
                }
            };

            let classifier = Arc::clone(&self.classifier);
            let prediction = self.prediction.clone();
            let liveness = Arc::clone(&self.liveness);
            let event_tx = self.event_tx.clone();
            let quiet = self.quiet;
            tokio::spawn(async move {
                let outcome = classifier.predict(&jpeg).await;
                drop(guard);

                // A completion that lands after stop must not touch state.
                if !liveness.load(Ordering::SeqCst) {
                    return;
                }

                let next = match outcome {
                    Ok(ClassifierVerdict::Prediction { label, confidence }) => {
                        PredictionState::from_verdict(label, confidence)
                    }
                    Ok(ClassifierVerdict::Collecting) => PredictionState::collecting(),
                    Ok(ClassifierVerdict::ServiceError(message)) => {
                        if !quiet {
                            eprintln!("wesign: classification service error: {message}");
                        }
                        PredictionState::model_error()
                    }
                    Err(e) => {
                        if !quiet {
                            eprintln!("wesign: classification request failed: {e}");
                        }
                        PredictionState::connection_error()
                    }
                };
                prediction.set(next.clone());
                emit(&event_tx, SessionEvent::PredictionUpdated(next));
            });
        }
    }
}
