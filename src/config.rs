use crate::defaults;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Config {
    pub capture: CaptureConfig,
    pub classifier: ClassifierConfig,
    pub voice: VoiceConfig,
}

/// Capture device configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    /// Device identifier, None selects the platform default
    pub device: Option<String>,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

/// Classification service configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Base URL of the classification service
    pub service_url: String,
    /// Dispatch timer period in milliseconds
    pub dispatch_interval_ms: u64,
    /// JPEG quality (1-100) for exported frames
    pub jpeg_quality: u8,
}

/// Speech recognition configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct VoiceConfig {
    /// BCP-47 language tag passed to the recognition capability
    pub language: String,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device: None,
            width: defaults::FRAME_WIDTH,
            height: defaults::FRAME_HEIGHT,
            frame_rate: defaults::FRAME_RATE,
        }
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            service_url: defaults::SERVICE_URL.to_string(),
            dispatch_interval_ms: defaults::DISPATCH_INTERVAL_MS,
            jpeg_quality: defaults::JPEG_QUALITY,
        }
    }
}

impl Default for VoiceConfig {
    fn default() -> Self {
        Self {
            language: defaults::VOICE_LANGUAGE.to_string(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// Returns an error if the file contains invalid TOML.
    /// Missing fields will use default values.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from a file or return defaults if file doesn't exist
    ///
    /// Only returns defaults if the file is missing.
    /// Returns errors for invalid TOML.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Self> {
        match Self::load(path) {
            Ok(config) => Ok(config),
            Err(e) => {
                if e.downcast_ref::<std::io::Error>()
                    .map(|io_err| io_err.kind() == std::io::ErrorKind::NotFound)
                    .unwrap_or(false)
                {
                    Ok(Self::default())
                } else {
                    Err(e)
                }
            }
        }
    }

    /// Write the configuration to a TOML file, creating parent directories.
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// Supported environment variables:
    /// - WESIGN_SERVICE_URL → classifier.service_url
    /// - WESIGN_VOICE_LANGUAGE → voice.language
    /// - WESIGN_CAPTURE_DEVICE → capture.device
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("WESIGN_SERVICE_URL")
            && !url.is_empty()
        {
            self.classifier.service_url = url;
        }

        if let Ok(language) = std::env::var("WESIGN_VOICE_LANGUAGE")
            && !language.is_empty()
        {
            self.voice.language = language;
        }

        if let Ok(device) = std::env::var("WESIGN_CAPTURE_DEVICE")
            && !device.is_empty()
        {
            self.capture.device = Some(device);
        }

        self
    }

    /// Get the default configuration file path
    ///
    /// Returns ~/.config/wesign/config.toml on Linux
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join("wesign")
            .join("config.toml")
    }
}
