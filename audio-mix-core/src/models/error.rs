use thiserror::Error;

use super::audio_models::AudioRole;

/// Errors that can occur while acquiring inputs or running a mix.
///
/// Every variant is terminal for the current operation; nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MixError {
    #[error("Both speech and music files are required")]
    MissingInput { missing: Vec<AudioRole> },

    #[error("unsupported {role} media type '{media_type}' (expected MP3, WAV, or OGG)")]
    UnsupportedMediaType { role: AudioRole, media_type: String },

    #[error("failed to load audio engine: {0}")]
    EngineLoad(String),

    #[error("audio engine is not loaded yet")]
    EngineNotReady,

    #[error("audio engine is busy")]
    EngineBusy,

    #[error("mix failed: {0}")]
    MixExecution(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("configuration failed: {0}")]
    Configuration(String),
}

impl MixError {
    /// Whether the error was caused by the caller's inputs rather than the engine.
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingInput { .. } | Self::UnsupportedMediaType { .. })
    }
}
