//! Perception session lifecycle.
//!
//! A session wires a frame source, a landmark annotator, and a sign
//! classifier into two cooperating tasks: a capture loop that polls frames,
//! derives landmarks, and redraws the shared overlay surface, and a
//! dispatch loop that periodically snapshots the surface and submits it for
//! classification. A shared liveness flag gates every asynchronous
//! continuation, so work that completes after `stop()` can no longer touch
//! session state.

mod dispatcher;
pub(crate) mod prediction;

pub use prediction::{PredictionState, SharedPrediction};

use crate::capture::{FrameSource, VideoFrame};
use crate::classify::SignClassifier;
use crate::config::Config;
use crate::defaults;
use crate::error::{Result, WeSignError};
use crate::landmarks::{LandmarkAnnotator, LandmarkSets};
use crate::overlay::{DrawSurface, OverlayRenderer};
use crossbeam_channel::Sender;
use dispatcher::{DispatchContext, DispatchLock};
use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Consecutive frame-read failures tolerated before the capture loop
/// gives up and releases the device.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 10;

/// How long `stop()` waits for worker tasks before detaching them.
const STOP_DEADLINE: Duration = Duration::from_secs(2);

/// Session lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SessionState {
    Idle = 0,
    Starting = 1,
    Running = 2,
    Stopping = 3,
}

/// Atomically shared [`SessionState`].
#[derive(Debug)]
pub struct SessionStateCell(AtomicU8);

impl SessionStateCell {
    fn new() -> Self {
        Self(AtomicU8::new(SessionState::Idle as u8))
    }

    pub fn load(&self) -> SessionState {
        match self.0.load(Ordering::SeqCst) {
            1 => SessionState::Starting,
            2 => SessionState::Running,
            3 => SessionState::Stopping,
            _ => SessionState::Idle,
        }
    }

    fn store(&self, state: SessionState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Events reported to an optional observer channel (crossbeam,
/// non-blocking; pass an unbounded channel to never lose events).
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// Capture device acquired, workers running.
    Started,
    /// The shared prediction state changed.
    PredictionUpdated(PredictionState),
    /// The capture loop gave up after persistent device errors.
    CaptureEnded,
    /// The session fully stopped.
    Stopped,
}

pub(crate) fn emit(tx: &Option<Sender<SessionEvent>>, event: SessionEvent) {
    if let Some(tx) = tx {
        let _ = tx.try_send(event);
    }
}

/// Runtime knobs for a session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub dispatch_interval: Duration,
    pub jpeg_quality: u8,
    pub quiet: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            width: defaults::FRAME_WIDTH,
            height: defaults::FRAME_HEIGHT,
            frame_rate: defaults::FRAME_RATE,
            dispatch_interval: Duration::from_millis(defaults::DISPATCH_INTERVAL_MS),
            jpeg_quality: defaults::JPEG_QUALITY,
            quiet: false,
        }
    }
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            width: config.capture.width,
            height: config.capture.height,
            frame_rate: config.capture.frame_rate,
            dispatch_interval: Duration::from_millis(config.classifier.dispatch_interval_ms),
            jpeg_quality: config.classifier.jpeg_quality,
            quiet: false,
        }
    }
}

/// Most recent capture result, owned by the capture loop.
struct FrameBuffer {
    frame: VideoFrame,
    landmarks: LandmarkSets,
}

/// Session factory. Holds configuration and the optional event channel;
/// `start` acquires the device and hands back a [`SessionHandle`].
pub struct Session {
    config: SessionConfig,
    event_tx: Option<Sender<SessionEvent>>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            event_tx: None,
        }
    }

    /// Attach an observer channel for session events.
    pub fn with_event_sender(mut self, tx: Sender<SessionEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    /// Acquire the capture device and launch the worker tasks.
    ///
    /// Refuses to start over an annotator that reports not ready. On
    /// failure the device is not held and the session stays idle.
    pub async fn start(
        &self,
        mut source: Box<dyn FrameSource>,
        annotator: Arc<dyn LandmarkAnnotator>,
        classifier: Arc<dyn SignClassifier>,
    ) -> Result<SessionHandle> {
        let state = Arc::new(SessionStateCell::new());
        state.store(SessionState::Starting);

        // Checked before the device so a dead annotator never holds it.
        if !annotator.is_ready() {
            state.store(SessionState::Idle);
            return Err(WeSignError::Annotation {
                message: "landmark annotator is not ready".to_string(),
            });
        }

        if let Err(e) = source.start() {
            state.store(SessionState::Idle);
            return Err(e);
        }

        let liveness = Arc::new(AtomicBool::new(true));
        let surface = Arc::new(Mutex::new(DrawSurface::new(
            self.config.width,
            self.config.height,
        )));
        let prediction = SharedPrediction::new(PredictionState::initializing());
        let lock = Arc::new(DispatchLock::new());

        let capture_task = tokio::spawn(run_capture(
            source,
            annotator,
            Arc::clone(&surface),
            Arc::clone(&liveness),
            prediction.clone(),
            self.event_tx.clone(),
            self.config.frame_rate,
            self.config.quiet,
        ));

        let dispatch_task = tokio::spawn(
            DispatchContext {
                liveness: Arc::clone(&liveness),
                surface: Arc::clone(&surface),
                classifier: Arc::clone(&classifier),
                prediction: prediction.clone(),
                lock: Arc::clone(&lock),
                interval: self.config.dispatch_interval,
                jpeg_quality: self.config.jpeg_quality,
                event_tx: self.event_tx.clone(),
                quiet: self.config.quiet,
            }
            .run(),
        );

        state.store(SessionState::Running);
        emit(&self.event_tx, SessionEvent::Started);

        Ok(SessionHandle {
            state,
            liveness,
            prediction,
            surface,
            classifier,
            tasks: vec![capture_task, dispatch_task],
            event_tx: self.event_tx.clone(),
            quiet: self.config.quiet,
        })
    }
}

/// Handle to a running session.
///
/// Dropping the handle without calling [`SessionHandle::stop`] clears the
/// liveness flag and detaches the workers; the capture loop releases the
/// device on its next tick.
pub struct SessionHandle {
    state: Arc<SessionStateCell>,
    liveness: Arc<AtomicBool>,
    prediction: SharedPrediction,
    surface: Arc<Mutex<DrawSurface>>,
    classifier: Arc<dyn SignClassifier>,
    tasks: Vec<JoinHandle<()>>,
    event_tx: Option<Sender<SessionEvent>>,
    quiet: bool,
}

impl SessionHandle {
    pub fn state(&self) -> SessionState {
        self.state.load()
    }

    pub fn is_running(&self) -> bool {
        self.liveness.load(Ordering::SeqCst)
    }

    /// Snapshot of the current prediction.
    pub fn prediction(&self) -> PredictionState {
        self.prediction.get()
    }

    /// Clone of the current overlay surface.
    pub fn surface_snapshot(&self) -> DrawSurface {
        self.surface
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Reset the recognition state.
    ///
    /// The prediction flips to the ready sentinel immediately; the service
    /// reset runs in the background and is not subject to the dispatch
    /// gate, so it goes through even with a classification in flight. If
    /// the reset request fails, the failure sentinel is shown instead.
    pub fn reset(&self) {
        self.prediction.set(PredictionState::ready());
        emit(
            &self.event_tx,
            SessionEvent::PredictionUpdated(PredictionState::ready()),
        );

        let classifier = Arc::clone(&self.classifier);
        let prediction = self.prediction.clone();
        let liveness = Arc::clone(&self.liveness);
        let event_tx = self.event_tx.clone();
        let quiet = self.quiet;
        tokio::spawn(async move {
            if let Err(e) = classifier.reset().await {
                if !quiet {
                    eprintln!("wesign: reset request failed: {e}");
                }
                if liveness.load(Ordering::SeqCst) {
                    prediction.set(PredictionState::reset_failed());
                    emit(
                        &event_tx,
                        SessionEvent::PredictionUpdated(PredictionState::reset_failed()),
                    );
                }
            }
        });
    }

    /// Stop the session: clear liveness, wait for the workers, release the
    /// device. Workers that miss the deadline are detached with a warning;
    /// the liveness gate keeps their late completions from touching state.
    pub async fn stop(mut self) -> Result<()> {
        self.state.store(SessionState::Stopping);
        self.liveness.store(false, Ordering::SeqCst);

        for task in self.tasks.drain(..) {
            match tokio::time::timeout(STOP_DEADLINE, task).await {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    if !self.quiet {
                        eprintln!("wesign: worker task failed during stop: {e}");
                    }
                }
                Err(_) => {
                    if !self.quiet {
                        eprintln!(
                            "wesign: worker task did not stop within {STOP_DEADLINE:?}, detaching"
                        );
                    }
                }
            }
        }

        self.state.store(SessionState::Idle);
        emit(&self.event_tx, SessionEvent::Stopped);
        Ok(())
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        if self.liveness.swap(false, Ordering::SeqCst) {
            self.state.store(SessionState::Stopping);
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn run_capture(
    mut source: Box<dyn FrameSource>,
    annotator: Arc<dyn LandmarkAnnotator>,
    surface: Arc<Mutex<DrawSurface>>,
    liveness: Arc<AtomicBool>,
    prediction: SharedPrediction,
    event_tx: Option<Sender<SessionEvent>>,
    frame_rate: u32,
    quiet: bool,
) {
    // Clamped to at least 1ms; tokio rejects a zero-period interval.
    let period = Duration::from_millis((1000 / u64::from(frame_rate.max(1))).max(1));
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let renderer = OverlayRenderer::new();
    let mut buffer: Option<FrameBuffer> = None;
    let mut consecutive_errors = 0u32;

    loop {
        ticker.tick().await;
        if !liveness.load(Ordering::SeqCst) {
            break;
        }

        let frame = match source.read_frame() {
            Ok(Some(frame)) => {
                consecutive_errors = 0;
                frame
            }
            Ok(None) => continue,
            Err(e) => {
                consecutive_errors += 1;
                if !quiet {
                    eprintln!("wesign: frame read failed: {e}");
                }
                if consecutive_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                    if !quiet {
                        eprintln!(
                            "wesign: giving up after {consecutive_errors} consecutive read errors"
                        );
                    }
                    emit(&event_tx, SessionEvent::CaptureEnded);
                    break;
                }
                continue;
            }
        };

        let landmarks = match annotator.process(&frame).await {
            Ok(sets) => sets,
            Err(e) => {
                // A frame the annotator cannot handle still gets drawn.
                if !quiet {
                    eprintln!("wesign: landmark annotation failed: {e}");
                }
                LandmarkSets::default()
            }
        };

        // The annotator yield may land after stop; re-check before
        // touching shared state.
        if !liveness.load(Ordering::SeqCst) {
            break;
        }

        let first_frame = buffer.is_none();
        let buf = buffer.insert(FrameBuffer { frame, landmarks });
        {
            let mut surface = surface
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            renderer.render(&buf.frame, &buf.landmarks, &mut surface);
        }

        if first_frame && prediction.get() == PredictionState::initializing() {
            prediction.set(PredictionState::collecting());
            emit(
                &event_tx,
                SessionEvent::PredictionUpdated(PredictionState::collecting()),
            );
        }
    }

    if let Err(e) = source.stop() {
        if !quiet {
            eprintln!("wesign: failed to release capture device: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::MockFrameSource;
    use crate::classify::MockClassifier;
    use crate::error::WeSignError;
    use crate::landmarks::MockAnnotator;

    fn quiet_config() -> SessionConfig {
        SessionConfig {
            width: 16,
            height: 16,
            frame_rate: 100,
            dispatch_interval: Duration::from_millis(10),
            jpeg_quality: 60,
            quiet: true,
        }
    }

    #[test]
    fn test_session_state_cell_round_trips() {
        let cell = SessionStateCell::new();
        assert_eq!(cell.load(), SessionState::Idle);
        for state in [
            SessionState::Starting,
            SessionState::Running,
            SessionState::Stopping,
            SessionState::Idle,
        ] {
            cell.store(state);
            assert_eq!(cell.load(), state);
        }
    }

    #[test]
    fn test_session_config_default_matches_capture_defaults() {
        let config = SessionConfig::default();
        assert_eq!(config.width, 640);
        assert_eq!(config.height, 480);
        assert_eq!(config.dispatch_interval, Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_start_failure_leaves_session_idle() {
        let session = Session::new(quiet_config());
        let source = MockFrameSource::new()
            .with_start_failure()
            .with_error_message("no camera");

        let result = session
            .start(
                Box::new(source),
                Arc::new(MockAnnotator::new()),
                Arc::new(MockClassifier::new()),
            )
            .await;

        match result {
            Err(WeSignError::CaptureUnavailable { message }) => {
                assert_eq!(message, "no camera");
            }
            _ => panic!("Expected CaptureUnavailable error"),
        }
    }

    #[tokio::test]
    async fn test_start_refuses_unready_annotator() {
        let session = Session::new(quiet_config());
        let source = MockFrameSource::new();

        let result = session
            .start(
                Box::new(source),
                Arc::new(MockAnnotator::new().with_failure()),
                Arc::new(MockClassifier::new()),
            )
            .await;

        match result {
            Err(WeSignError::Annotation { message }) => {
                assert_eq!(message, "landmark annotator is not ready");
            }
            _ => panic!("Expected Annotation error"),
        }
    }

    #[tokio::test]
    async fn test_session_runs_and_stops() {
        let session = Session::new(quiet_config());
        let classifier = Arc::new(MockClassifier::new());

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_geometry(16, 16)),
                Arc::new(MockAnnotator::new().with_full_detection()),
                Arc::clone(&classifier) as Arc<dyn SignClassifier>,
            )
            .await
            .unwrap();

        assert_eq!(handle.state(), SessionState::Running);
        assert!(handle.is_running());

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(classifier.predict_calls() > 0);

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_first_frame_moves_prediction_to_collecting() {
        let session = Session::new(quiet_config());
        // Long latency keeps the classifier from overwriting the sentinel.
        let classifier = Arc::new(MockClassifier::new().with_latency(Duration::from_secs(5)));

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_geometry(16, 16)),
                Arc::new(MockAnnotator::new()),
                classifier as Arc<dyn SignClassifier>,
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(handle.prediction(), PredictionState::collecting());

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_stop_reports_stopped_event() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let session = Session::new(quiet_config()).with_event_sender(tx);

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_geometry(16, 16)),
                Arc::new(MockAnnotator::new()),
                Arc::new(MockClassifier::new()),
            )
            .await
            .unwrap();

        handle.stop().await.unwrap();

        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert_eq!(events.first(), Some(&SessionEvent::Started));
        assert_eq!(events.last(), Some(&SessionEvent::Stopped));
    }

    #[tokio::test]
    async fn test_reset_sets_ready_sentinel() {
        let session = Session::new(quiet_config());
        let classifier = Arc::new(MockClassifier::new().with_latency(Duration::from_secs(5)));

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_geometry(16, 16)),
                Arc::new(MockAnnotator::new()),
                Arc::clone(&classifier) as Arc<dyn SignClassifier>,
            )
            .await
            .unwrap();

        handle.reset();
        assert_eq!(handle.prediction(), PredictionState::ready());

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(classifier.reset_calls(), 1);

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_reset_shows_failure_sentinel() {
        let session = Session::new(quiet_config());
        let classifier = Arc::new(
            MockClassifier::new()
                .with_latency(Duration::from_secs(5))
                .with_reset_failure(),
        );

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_geometry(16, 16)),
                Arc::new(MockAnnotator::new()),
                classifier as Arc<dyn SignClassifier>,
            )
            .await
            .unwrap();

        handle.reset();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.prediction(), PredictionState::reset_failed());

        handle.stop().await.unwrap();
    }

    #[tokio::test]
    async fn test_capture_gives_up_after_persistent_read_errors() {
        let (tx, rx) = crossbeam_channel::unbounded();
        let session = Session::new(quiet_config()).with_event_sender(tx);

        let handle = session
            .start(
                Box::new(MockFrameSource::new().with_read_failure()),
                Arc::new(MockAnnotator::new()),
                Arc::new(MockClassifier::new()),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(300)).await;
        let events: Vec<SessionEvent> = rx.try_iter().collect();
        assert!(events.contains(&SessionEvent::CaptureEnded));

        handle.stop().await.unwrap();
    }
}
