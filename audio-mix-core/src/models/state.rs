use std::fmt;

use super::error::MixError;

/// Engine session state machine.
///
/// State transitions:
/// ```text
/// uninitialized → loading → ready ⇄ busy
///                    ↓
///                  failed
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineState {
    Uninitialized,
    Loading,
    Ready,
    Busy,
    Failed(MixError),
}

impl EngineState {
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// Lowercase name used in logs and status payloads.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Busy => "busy",
            Self::Failed(_) => "failed",
        }
    }
}

/// Coarse progress reported while loading the engine or running a mix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MixStatus {
    LoadingEngine,
    LoadingSpeech,
    LoadingMusic,
    Merging,
    PreparingDownload,
}

impl fmt::Display for MixStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            Self::LoadingEngine => "Loading audio processing capabilities...",
            Self::LoadingSpeech => "Loading speech audio...",
            Self::LoadingMusic => "Loading music audio...",
            Self::Merging => "Merging audio files...",
            Self::PreparingDownload => "Preparing download...",
        };
        f.write_str(message)
    }
}
