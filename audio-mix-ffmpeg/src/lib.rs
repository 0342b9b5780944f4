//! # audio-mix-ffmpeg
//!
//! `ffmpeg` process backend for audio-mix.
//!
//! Provides:
//! - `FfmpegProcessEngine`: `MixEngine` that runs an ffmpeg binary over a private scratch directory
//! - `binary`: locating and version-probing the executable
//!
//! ## Requirements
//! - an `ffmpeg` build with `libmp3lame` on `PATH`, or an explicit binary path
//!
//! ## Usage
//! ```no_run
//! use audio_mix_core::{MixConfiguration, MixSession};
//! use audio_mix_ffmpeg::{FfmpegConfig, FfmpegProcessEngine};
//!
//! let engine = FfmpegProcessEngine::new(FfmpegConfig::default());
//! let session = MixSession::new(engine, MixConfiguration::server()).unwrap();
//! session.load().unwrap();
//! ```

pub mod binary;
pub mod process_engine;

pub use process_engine::{FfmpegConfig, FfmpegProcessEngine};
