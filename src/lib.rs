//! wesign - Real-time Filipino Sign Language detection
//!
//! Camera frames in, landmark overlays and sign predictions out, plus a
//! voice-to-sign dictionary lookup.

#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
#![warn(clippy::let_underscore_must_use)]

pub mod capture;
pub mod classify;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod defaults;
pub mod error;
pub mod landmarks;
pub mod overlay;
pub mod session;
pub mod signs;
pub mod voice;

// Core traits (capture → annotate → classify)
pub use capture::{FrameSource, VideoFrame};
pub use classify::{ClassifierVerdict, HttpClassifier, SignClassifier};
pub use landmarks::{LandmarkAnnotator, LandmarkSets, NullAnnotator};

// Session
pub use session::{
    PredictionState, Session, SessionConfig, SessionEvent, SessionHandle, SessionState,
};

// Overlay
pub use overlay::{DrawSurface, OverlayRenderer};

// Voice lookup
pub use voice::{SignMatch, SpeechRecognizer, VoiceSession, lookup_signs};

// Error handling
pub use error::{Result, WeSignError};

// Config
pub use config::Config;
