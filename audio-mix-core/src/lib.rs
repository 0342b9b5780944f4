//! # audio-mix-core
//!
//! Engine-agnostic core of the speech-over-music mixer.
//!
//! Holds the fixed mix recipe, the input/result models, the engine session
//! lifecycle, and scratch-file handling. Concrete engines (an `ffmpeg`
//! process, an in-browser WASM build) implement the `MixEngine` trait and
//! plug into the generic `MixSession`.
//!
//! ## Architecture
//!
//! ```text
//! audio-mix-core (this crate)
//! ├── traits/       ← MixEngine, MixDelegate
//! ├── models/       ← MixError, EngineState, MixConfiguration, AudioInput, MixResult, etc.
//! ├── processing/   ← MixRecipe (filter graph + arguments), media sniffing, WAV helpers
//! ├── session/      ← MixSession (lazy engine owner and orchestrator)
//! └── storage/      ← ScratchDir, checksums
//! ```

pub mod models;
pub mod processing;
pub mod session;
pub mod storage;
pub mod traits;

// Re-export key types at crate root for convenience.
pub use models::audio_models::{AudioInput, AudioRole, MixRequest, SUPPORTED_MEDIA_TYPES};
pub use models::config::{MixConfiguration, OutputNaming};
pub use models::error::MixError;
pub use models::mix_result::{MixMetadata, MixResult};
pub use models::state::{EngineState, MixStatus};
pub use processing::filter_graph::MixRecipe;
pub use session::mix_session::MixSession;
pub use storage::scratch::ScratchDir;
pub use traits::mix_delegate::MixDelegate;
pub use traits::mix_engine::MixEngine;
