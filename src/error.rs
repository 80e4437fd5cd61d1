//! Error types for wesign.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WeSignError {
    // Configuration errors
    #[error("Configuration file not found at {path}")]
    ConfigFileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ConfigParse { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    // Capture errors
    #[error("Capture device unavailable: {message}")]
    CaptureUnavailable { message: String },

    #[error("Frame capture failed: {message}")]
    CaptureFailed { message: String },

    // Landmark annotation errors
    #[error("Landmark annotation failed: {message}")]
    Annotation { message: String },

    // Classification errors
    #[error("Classification request failed: {message}")]
    Transport { message: String },

    #[error("Classification service error: {message}")]
    Service { message: String },

    // Frame export errors
    #[error("Frame encoding failed: {message}")]
    ImageEncode { message: String },

    // Speech recognition errors
    #[error("Speech recognition failed: {message}")]
    Recognition { message: String },

    // General I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Generic error for cases not covered above
    #[error("{0}")]
    Other(String),
}

// Type alias for convenience
pub type Result<T> = std::result::Result<T, WeSignError>;
