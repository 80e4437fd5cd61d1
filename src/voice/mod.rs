//! Voice-driven sign lookup.
//!
//! A [`VoiceSession`] runs one utterance at a time: start listening, wait
//! for a terminal recognition result, map it to catalog signs, report the
//! outcome, return to idle. Stopping while listening discards whatever the
//! recognizer produces afterwards.

pub mod lookup;

pub use lookup::{SignMatch, lookup_signs};

use crate::error::{Result, WeSignError};
use async_trait::async_trait;
use crossbeam_channel::Sender;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Trait for the speech recognition capability.
///
/// This trait allows swapping implementations (platform recognizer vs
/// mock). `recognize` resolves once with a single terminal utterance.
#[async_trait]
pub trait SpeechRecognizer: Send + Sync {
    async fn recognize(&self) -> Result<String>;
}

/// Voice session phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum VoiceState {
    Idle = 0,
    Listening = 1,
}

#[derive(Debug)]
struct VoiceStateCell(AtomicU8);

impl VoiceStateCell {
    fn new() -> Self {
        Self(AtomicU8::new(VoiceState::Idle as u8))
    }

    fn load(&self) -> VoiceState {
        match self.0.load(Ordering::SeqCst) {
            1 => VoiceState::Listening,
            _ => VoiceState::Idle,
        }
    }

    fn store(&self, state: VoiceState) {
        self.0.store(state as u8, Ordering::SeqCst);
    }
}

/// Events reported to an optional observer channel (crossbeam,
/// non-blocking).
#[derive(Debug, Clone, PartialEq)]
pub enum VoiceEvent {
    /// Recognition started.
    Listening,
    /// A terminal utterance arrived and was mapped to signs.
    Recognized {
        transcript: String,
        matches: Vec<SignMatch>,
    },
    /// Recognition failed; the session is idle again.
    Failed(String),
}

fn emit(tx: &Option<Sender<VoiceEvent>>, event: VoiceEvent) {
    if let Some(tx) = tx {
        let _ = tx.try_send(event);
    }
}

/// One-utterance-at-a-time voice lookup session.
pub struct VoiceSession {
    recognizer: Arc<dyn SpeechRecognizer>,
    state: Arc<VoiceStateCell>,
    active: Option<Arc<AtomicBool>>,
    event_tx: Option<Sender<VoiceEvent>>,
}

impl VoiceSession {
    pub fn new(recognizer: Arc<dyn SpeechRecognizer>) -> Self {
        Self {
            recognizer,
            state: Arc::new(VoiceStateCell::new()),
            active: None,
            event_tx: None,
        }
    }

    /// Attach an observer channel for voice events.
    pub fn with_event_sender(mut self, tx: Sender<VoiceEvent>) -> Self {
        self.event_tx = Some(tx);
        self
    }

    pub fn state(&self) -> VoiceState {
        self.state.load()
    }

    /// Begin listening for one utterance.
    ///
    /// Returns an error if the session is already listening. The result
    /// arrives as a [`VoiceEvent`] on the observer channel; either way the
    /// session returns to idle.
    pub fn start(&mut self) -> Result<()> {
        if self.state.load() == VoiceState::Listening {
            return Err(WeSignError::Recognition {
                message: "already listening".to_string(),
            });
        }

        let active = Arc::new(AtomicBool::new(true));
        self.active = Some(Arc::clone(&active));
        self.state.store(VoiceState::Listening);
        emit(&self.event_tx, VoiceEvent::Listening);

        let recognizer = Arc::clone(&self.recognizer);
        let state = Arc::clone(&self.state);
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            let outcome = recognizer.recognize().await;

            // A result that lands after stop() is discarded.
            if !active.load(Ordering::SeqCst) {
                return;
            }
            state.store(VoiceState::Idle);

            match outcome {
                Ok(transcript) => {
                    let transcript = transcript.trim().to_lowercase();
                    let matches = lookup_signs(&transcript);
                    emit(
                        &event_tx,
                        VoiceEvent::Recognized {
                            transcript,
                            matches,
                        },
                    );
                }
                Err(e) => {
                    emit(&event_tx, VoiceEvent::Failed(e.to_string()));
                }
            }
        });
        Ok(())
    }

    /// Stop listening. Safe to call when idle.
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            active.store(false, Ordering::SeqCst);
        }
        self.state.store(VoiceState::Idle);
    }
}

/// Mock recognizer for testing
pub struct MockRecognizer {
    utterance: Mutex<String>,
    delay: Option<Duration>,
    should_fail: bool,
    recognize_calls: AtomicUsize,
}

impl MockRecognizer {
    /// Create a mock that recognizes an empty utterance
    pub fn new() -> Self {
        Self {
            utterance: Mutex::new(String::new()),
            delay: None,
            should_fail: false,
            recognize_calls: AtomicUsize::new(0),
        }
    }

    /// Configure the utterance the mock will report
    pub fn with_utterance(self, utterance: &str) -> Self {
        *self.utterance.lock().expect("utterance poisoned") = utterance.to_string();
        self
    }

    /// Configure an artificial recognition delay
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Configure the mock to fail recognition
    pub fn with_failure(mut self) -> Self {
        self.should_fail = true;
        self
    }

    /// Number of recognize calls so far
    pub fn recognize_calls(&self) -> usize {
        self.recognize_calls.load(Ordering::SeqCst)
    }
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SpeechRecognizer for MockRecognizer {
    async fn recognize(&self) -> Result<String> {
        self.recognize_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if self.should_fail {
            Err(WeSignError::Recognition {
                message: "mock recognition failure".to_string(),
            })
        } else {
            Ok(self.utterance.lock().expect("utterance poisoned").clone())
        }
    }
}
